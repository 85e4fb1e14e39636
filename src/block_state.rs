use serde::{Deserialize, Serialize};
use smol_str::SmolStr;
use std::fmt;
use std::str::FromStr;

/// The full identity of a block: a namespaced type name plus its variant
/// properties (orientation, waterlogging, and the like).
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct BlockState {
    pub name: SmolStr,
    pub properties: Vec<(SmolStr, SmolStr)>,
}

/// Error produced when parsing the `name[key=value,...]` text form.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum ParseBlockStateError {
    #[error("empty block state string")]
    Empty,
    #[error("unterminated property list in `{0}`")]
    UnterminatedProperties(String),
    #[error("malformed property `{0}` (expected key=value)")]
    MalformedProperty(String),
    #[error("trailing characters after property list in `{0}`")]
    TrailingCharacters(String),
}

impl BlockState {
    pub fn new(name: impl Into<SmolStr>) -> Self {
        BlockState {
            name: name.into(),
            properties: Vec::new(),
        }
    }

    pub fn with_property(mut self, key: impl Into<SmolStr>, value: impl Into<SmolStr>) -> Self {
        self.set_property(key, value);
        self
    }

    pub fn set_property(&mut self, key: impl Into<SmolStr>, value: impl Into<SmolStr>) {
        let key = key.into();
        let value = value.into();
        for (k, v) in &mut self.properties {
            if *k == key {
                *v = value;
                return;
            }
        }
        self.properties.push((key, value));
    }

    pub fn property(&self, key: &str) -> Option<&SmolStr> {
        self.properties
            .iter()
            .find(|(k, _)| k == key)
            .map(|(_, v)| v)
    }

    pub fn has_property(&self, key: &str) -> bool {
        self.properties.iter().any(|(k, _)| k == key)
    }

    /// True when every `(key, value)` pair in `required` appears on this
    /// state with an equal value. Extra properties on `self` are allowed.
    pub fn satisfies(&self, required: &[(SmolStr, SmolStr)]) -> bool {
        required
            .iter()
            .all(|(k, v)| self.property(k).map_or(false, |own| own == v))
    }

    /// Whether this state is an air placeholder rather than a real block.
    pub fn is_air(&self) -> bool {
        let path = self
            .name
            .strip_prefix("minecraft:")
            .unwrap_or(self.name.as_str());
        matches!(path, "air" | "cave_air" | "void_air")
    }
}

impl fmt::Display for BlockState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.name)?;
        if !self.properties.is_empty() {
            write!(f, "[")?;
            for (i, (key, value)) in self.properties.iter().enumerate() {
                if i > 0 {
                    write!(f, ",")?;
                }
                write!(f, "{}={}", key, value)?;
            }
            write!(f, "]")?;
        }
        Ok(())
    }
}

impl FromStr for BlockState {
    type Err = ParseBlockStateError;

    /// Parses the bracket form used in rule files and commands, e.g.
    /// `minecraft:oak_log[axis=y]`.
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let s = s.trim();
        if s.is_empty() {
            return Err(ParseBlockStateError::Empty);
        }
        let Some(open) = s.find('[') else {
            return Ok(BlockState::new(s));
        };
        if !s.ends_with(']') {
            return Err(ParseBlockStateError::UnterminatedProperties(s.to_string()));
        }
        let name = s[..open].trim();
        if name.is_empty() {
            return Err(ParseBlockStateError::Empty);
        }
        if s[open..].matches('[').count() > 1 {
            return Err(ParseBlockStateError::TrailingCharacters(s.to_string()));
        }
        let mut state = BlockState::new(name);
        let body = &s[open + 1..s.len() - 1];
        if body.trim().is_empty() {
            return Ok(state);
        }
        for pair in body.split(',') {
            let Some((key, value)) = pair.split_once('=') else {
                return Err(ParseBlockStateError::MalformedProperty(pair.to_string()));
            };
            let (key, value) = (key.trim(), value.trim());
            if key.is_empty() || value.is_empty() {
                return Err(ParseBlockStateError::MalformedProperty(pair.to_string()));
            }
            state.set_property(key, value);
        }
        Ok(state)
    }
}
