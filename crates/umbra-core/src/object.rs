use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

use crate::value::Value;

/// Where an object is.
///
/// An object lives in exactly one place, so the "in a room", "inside another
/// object" and "carried by the player" views can never disagree.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Placement {
    /// Physically in a room.
    Room(String),
    /// Inside another object.
    Container(String),
    /// In the player's inventory.
    Carried,
    /// Not in the world (destroyed, or not yet placed).
    #[default]
    Nowhere,
}

impl Placement {
    /// The room id, if the object sits directly in a room.
    pub fn location(&self) -> Option<&str> {
        match self {
            Self::Room(id) => Some(id),
            _ => None,
        }
    }

    /// The container id, if the object is inside another object.
    pub fn contained_in(&self) -> Option<&str> {
        match self {
            Self::Container(id) => Some(id),
            _ => None,
        }
    }

    /// Whether the player carries the object.
    pub fn is_carried(&self) -> bool {
        matches!(self, Self::Carried)
    }
}

/// An interactive entity with placement and capability flags.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct GameObject {
    /// Unique key.
    pub id: String,
    /// Display name.
    pub name: String,
    /// Extra names the player may use.
    pub aliases: Vec<String>,
    /// Examine text.
    pub description: String,
    /// Text shown by `read`.
    pub text: Option<String>,
    /// Where the object is.
    pub placement: Placement,
    /// Hidden objects are invisible and unreachable until revealed.
    pub hidden: bool,
    /// Can be worn.
    pub is_wearable: bool,
    /// Currently worn. Only meaningful while carried.
    pub is_worn: bool,
    /// Can be opened and closed.
    pub is_openable: bool,
    /// Currently open.
    pub is_open: bool,
    /// Can be locked.
    pub is_lockable: bool,
    /// Currently locked.
    pub is_locked: bool,
    /// Gives off light (subject to `is_switched_on` for switchable objects).
    pub is_lit: bool,
    /// Cannot be taken.
    pub is_fixed: bool,
    /// Cosmetic: never listed and cannot be taken.
    pub is_scenery: bool,
    /// Can hold other objects.
    pub is_container: bool,
    /// Can be switched on and off.
    pub is_switchable: bool,
    /// Currently switched on.
    pub is_switched_on: bool,
    /// Puzzle-specific state such as `searched` or `burned`.
    pub custom_state: BTreeMap<String, Value>,
}

impl GameObject {
    /// Create a plain object placed nowhere.
    pub fn new(id: impl Into<String>, name: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            name: name.into(),
            ..Self::default()
        }
    }

    /// Place the object.
    pub fn at(mut self, placement: Placement) -> Self {
        self.placement = placement;
        self
    }

    /// Add an alias.
    pub fn with_alias(mut self, alias: impl Into<String>) -> Self {
        self.aliases.push(alias.into());
        self
    }

    /// Set the description.
    pub fn with_description(mut self, description: impl Into<String>) -> Self {
        self.description = description.into();
        self
    }

    /// Set a custom state entry.
    pub fn with_state(mut self, key: impl Into<String>, value: impl Into<Value>) -> Self {
        self.custom_state.insert(key.into(), value.into());
        self
    }

    /// Whether the player may take this object.
    pub fn is_portable(&self) -> bool {
        !self.is_fixed && !self.is_scenery
    }

    /// Whether things inside can be seen and reached.
    pub fn is_open_container(&self) -> bool {
        self.is_container && (!self.is_openable || self.is_open)
    }

    /// Whether the object currently emits light.
    pub fn gives_light(&self) -> bool {
        self.is_lit && (!self.is_switchable || self.is_switched_on)
    }

    /// Read a custom state entry as a flag; missing entries are `false`.
    pub fn state_flag(&self, key: &str) -> bool {
        self.custom_state.get(key).is_some_and(Value::is_truthy)
    }

    /// Whether `name` equals the object's name, id, or one of its aliases.
    /// `name` must already be lowercase.
    pub fn matches_exactly(&self, name: &str) -> bool {
        self.name.to_lowercase() == name
            || self.id.to_lowercase() == name
            || self.aliases.iter().any(|a| a.to_lowercase() == name)
    }

    /// Whether `name` appears inside the object's name or one of its aliases.
    /// `name` must already be lowercase.
    pub fn matches_partially(&self, name: &str) -> bool {
        self.name.to_lowercase().contains(name)
            || self.aliases.iter().any(|a| a.to_lowercase().contains(name))
    }

    /// Read a property by path.
    ///
    /// Accepts the camelCase field names (`isOpen`), their snake_case forms,
    /// `location`, `containedIn`, and `customState.<key>`.
    pub fn property(&self, path: &str) -> Option<Value> {
        if let Some(key) = path
            .strip_prefix("customState.")
            .or_else(|| path.strip_prefix("custom_state."))
        {
            return self.custom_state.get(key).cloned();
        }
        let flag = match normalize_property(path).as_str() {
            "hidden" => self.hidden,
            "visible" => !self.hidden,
            "iscarried" => self.placement.is_carried(),
            "iswearable" => self.is_wearable,
            "isworn" => self.is_worn,
            "isopenable" => self.is_openable,
            "isopen" => self.is_open,
            "islockable" => self.is_lockable,
            "islocked" => self.is_locked,
            "islit" => self.is_lit,
            "isfixed" => self.is_fixed,
            "isscenery" => self.is_scenery,
            "iscontainer" => self.is_container,
            "isswitchable" => self.is_switchable,
            "isswitchedon" => self.is_switched_on,
            "location" => return self.placement.location().map(Value::from),
            "containedin" => return self.placement.contained_in().map(Value::from),
            _ => return None,
        };
        Some(Value::Boolean(flag))
    }

    /// Write a boolean property or custom state entry by path.
    ///
    /// Placement and worn state cannot be changed this way; returns `false`
    /// for unknown, placement, or worn paths.
    pub fn set_property(&mut self, path: &str, value: Value) -> bool {
        if let Some(key) = path
            .strip_prefix("customState.")
            .or_else(|| path.strip_prefix("custom_state."))
        {
            self.custom_state.insert(key.to_string(), value);
            return true;
        }
        let flag = value.is_truthy();
        let field = match normalize_property(path).as_str() {
            "hidden" => &mut self.hidden,
            "iswearable" => &mut self.is_wearable,
            "isopenable" => &mut self.is_openable,
            "isopen" => &mut self.is_open,
            "islockable" => &mut self.is_lockable,
            "islocked" => &mut self.is_locked,
            "islit" => &mut self.is_lit,
            "isfixed" => &mut self.is_fixed,
            "isscenery" => &mut self.is_scenery,
            "iscontainer" => &mut self.is_container,
            "isswitchable" => &mut self.is_switchable,
            "isswitchedon" => &mut self.is_switched_on,
            "visible" => {
                self.hidden = !flag;
                return true;
            }
            _ => return false,
        };
        *field = flag;
        true
    }
}

fn normalize_property(path: &str) -> String {
    path.chars()
        .filter(|c| *c != '_')
        .collect::<String>()
        .to_lowercase()
}

/// The mutable part of an object, stored in save data.
///
/// Static text (name, description, aliases) is deliberately absent so that
/// content can be edited without invalidating saves.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ObjectOverride {
    /// Where the object is.
    pub placement: Placement,
    /// Hidden flag.
    pub hidden: bool,
    /// Worn flag.
    pub is_worn: bool,
    /// Open flag.
    pub is_open: bool,
    /// Locked flag.
    pub is_locked: bool,
    /// Lit flag.
    pub is_lit: bool,
    /// Switched-on flag.
    pub is_switched_on: bool,
    /// Custom state entries.
    #[serde(default)]
    pub custom_state: BTreeMap<String, Value>,
}

impl ObjectOverride {
    /// Snapshot the mutable fields of an object.
    pub fn capture(object: &GameObject) -> Self {
        Self {
            placement: object.placement.clone(),
            hidden: object.hidden,
            is_worn: object.is_worn,
            is_open: object.is_open,
            is_locked: object.is_locked,
            is_lit: object.is_lit,
            is_switched_on: object.is_switched_on,
            custom_state: object.custom_state.clone(),
        }
    }

    /// Write the flags back onto an object. Placement is applied separately
    /// by the world store so room listings stay consistent.
    pub fn apply_flags(&self, object: &mut GameObject) {
        object.hidden = self.hidden;
        object.is_worn = self.is_worn;
        object.is_open = self.is_open;
        object.is_locked = self.is_locked;
        object.is_lit = self.is_lit;
        object.is_switched_on = self.is_switched_on;
        object.custom_state = self.custom_state.clone();
    }
}
