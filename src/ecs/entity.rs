/// Opaque entity handle
///
/// The generation makes handles to destroyed entities stale: a recycled slot
/// gets a new generation, so `EntityManager::exists` rejects old handles.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct Entity {
    pub index: u32,
    pub generation: u32,
}

impl Entity {
    /// The "no entity" handle. Never exists.
    pub const NULL: Entity = Entity {
        index: u32::MAX,
        generation: 0,
    };

    pub fn is_null(self) -> bool {
        self == Entity::NULL
    }
}

impl Default for Entity {
    fn default() -> Self {
        Entity::NULL
    }
}

/// Per-slot bookkeeping
#[derive(Debug, Clone)]
struct EntitySlot {
    generation: u32,
    alive: bool,
    persistent: bool,
    prefab: Option<String>,
}

/// Manages entity creation and destruction
pub struct EntityManager {
    slots: Vec<EntitySlot>,
    free_list: Vec<u32>,
    count: usize,
}

impl EntityManager {
    pub fn new() -> Self {
        Self {
            slots: Vec::new(),
            free_list: Vec::new(),
            count: 0,
        }
    }

    /// Create a new entity
    pub fn create(&mut self, persistent: bool, prefab: Option<String>) -> Entity {
        let index = match self.free_list.pop() {
            Some(index) => index,
            None => {
                self.slots.push(EntitySlot {
                    generation: 0,
                    alive: false,
                    persistent: true,
                    prefab: None,
                });
                (self.slots.len() - 1) as u32
            }
        };

        let slot = &mut self.slots[index as usize];
        slot.generation = slot.generation.wrapping_add(1);
        slot.alive = true;
        slot.persistent = persistent;
        slot.prefab = prefab;
        self.count += 1;

        Entity {
            index,
            generation: slot.generation,
        }
    }

    /// Destroy an entity (returns true if it existed)
    pub fn destroy(&mut self, entity: Entity) -> bool {
        if !self.exists(entity) {
            return false;
        }

        let slot = &mut self.slots[entity.index as usize];
        slot.alive = false;
        slot.prefab = None;
        self.free_list.push(entity.index);
        self.count -= 1;
        true
    }

    /// Check if an entity handle still refers to a live entity
    pub fn exists(&self, entity: Entity) -> bool {
        self.slot(entity).is_some()
    }

    pub fn is_persistent(&self, entity: Entity) -> bool {
        self.slot(entity).map_or(false, |slot| slot.persistent)
    }

    pub fn prefab(&self, entity: Entity) -> Option<&str> {
        self.slot(entity).and_then(|slot| slot.prefab.as_deref())
    }

    /// Get the number of active entities
    pub fn count(&self) -> usize {
        self.count
    }

    /// Iterate over all live entities
    pub fn iter(&self) -> impl Iterator<Item = Entity> + '_ {
        self.slots
            .iter()
            .enumerate()
            .filter(|(_, slot)| slot.alive)
            .map(|(index, slot)| Entity {
                index: index as u32,
                generation: slot.generation,
            })
    }

    fn slot(&self, entity: Entity) -> Option<&EntitySlot> {
        self.slots
            .get(entity.index as usize)
            .filter(|slot| slot.alive && slot.generation == entity.generation)
    }
}

impl Default for EntityManager {
    fn default() -> Self {
        Self::new()
    }
}
