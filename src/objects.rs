use std::collections::HashMap;

use glam::Vec3;
use hecs::Entity;

/// Closed set of interactive node names in the park asset.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum ObjectName {
    Project1,
    Project2,
    Project3,
    Chicken,
    Snorlax,
    Pikachu,
    Bulbasaur,
    Charmander,
    Squirtle,
    Chest,
    Picnic,
}

/// What a click on an interactive object does.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Interaction {
    /// Decorative bounce animation (the critters).
    Bounce,
    /// Content panel (projects, about, contact).
    Panel,
}

impl ObjectName {
    pub const ALL: [ObjectName; 11] = [
        ObjectName::Project1,
        ObjectName::Project2,
        ObjectName::Project3,
        ObjectName::Chicken,
        ObjectName::Snorlax,
        ObjectName::Pikachu,
        ObjectName::Bulbasaur,
        ObjectName::Charmander,
        ObjectName::Squirtle,
        ObjectName::Chest,
        ObjectName::Picnic,
    ];

    /// Match a scene-graph node name against the closed set.
    pub fn parse(name: &str) -> Option<Self> {
        match name {
            "Project_1" => Some(Self::Project1),
            "Project_2" => Some(Self::Project2),
            "Project_3" => Some(Self::Project3),
            "Chicken" => Some(Self::Chicken),
            "Snorlax" => Some(Self::Snorlax),
            "Pikachu" => Some(Self::Pikachu),
            "Bulbasaur" => Some(Self::Bulbasaur),
            "Charmander" => Some(Self::Charmander),
            "Squirtle" => Some(Self::Squirtle),
            "Chest" => Some(Self::Chest),
            "Picnic" => Some(Self::Picnic),
            _ => None,
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Project1 => "Project_1",
            Self::Project2 => "Project_2",
            Self::Project3 => "Project_3",
            Self::Chicken => "Chicken",
            Self::Snorlax => "Snorlax",
            Self::Pikachu => "Pikachu",
            Self::Bulbasaur => "Bulbasaur",
            Self::Charmander => "Charmander",
            Self::Squirtle => "Squirtle",
            Self::Chest => "Chest",
            Self::Picnic => "Picnic",
        }
    }

    pub fn interaction(&self) -> Interaction {
        match self {
            Self::Chicken
            | Self::Snorlax
            | Self::Pikachu
            | Self::Bulbasaur
            | Self::Charmander
            | Self::Squirtle => Interaction::Bounce,
            Self::Project1 | Self::Project2 | Self::Project3 | Self::Chest | Self::Picnic => {
                Interaction::Panel
            }
        }
    }
}

/// Registry entry for one interactive object. The node handle is a
/// non-owning reference into the scene world.
pub struct InteractiveObject {
    pub name: ObjectName,
    pub node: Entity,
    pub highlighted: bool,
}

/// Last settled transform of an interactive object. Never reflects a
/// mid-animation transform.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct RestState {
    pub position: Vec3,
    pub rotation: Vec3,
    pub scale: Vec3,
}

/// Rest transforms keyed by object name. Initialized once at scene scan,
/// overwritten only when a bounce settles.
#[derive(Default)]
pub struct ObjectStateStore {
    states: HashMap<ObjectName, RestState>,
}

impl ObjectStateStore {
    pub fn get(&self, name: ObjectName) -> Option<&RestState> {
        self.states.get(&name)
    }

    pub fn set(&mut self, name: ObjectName, rest: RestState) {
        self.states.insert(name, rest);
    }

    pub fn len(&self) -> usize {
        self.states.len()
    }

    pub fn is_empty(&self) -> bool {
        self.states.is_empty()
    }
}
