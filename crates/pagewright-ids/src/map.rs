//! Ordered old-to-new identifier maps and derived-prefix conventions.

use core::fmt;
use std::str::FromStr;

use serde::de::{self, MapAccess, Visitor};
use serde::ser::SerializeMap;
use serde::{Deserialize, Deserializer, Serialize, Serializer};

use crate::error::RenameError;

/// An ordered mapping from old identifiers to new ones.
///
/// Identity pairs are not renamed but kept as reserved names, so no other pair
/// may take them. Old identifiers are unique; the cross-pair collision rules
/// are checked by [`crate::rename`], which also sees derived forms.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct IdentifierMap {
    pairs: Vec<(String, String)>,
    reserved: Vec<String>,
}

impl IdentifierMap {
    /// An empty map.
    #[must_use]
    pub const fn new() -> Self {
        Self {
            pairs: Vec::new(),
            reserved: Vec::new(),
        }
    }

    /// Build a map from `(old, new)` pairs, in order.
    ///
    /// # Errors
    ///
    /// See [`Self::insert`].
    pub fn from_pairs<I, O, N>(pairs: I) -> Result<Self, RenameError>
    where
        I: IntoIterator<Item = (O, N)>,
        O: Into<String>,
        N: Into<String>,
    {
        let mut map = Self::new();
        for (old, new) in pairs {
            let _ = map.insert(old, new)?;
        }
        Ok(map)
    }

    /// Append a pair. Returns `false` if the pair was an identity, which is
    /// reserved instead of renamed.
    ///
    /// # Errors
    ///
    /// Returns [`RenameError::EmptyIdentifier`] if either side is empty and
    /// [`RenameError::DuplicateIdentifier`] if `old` is already mapped.
    pub fn insert(
        &mut self,
        old: impl Into<String>,
        new: impl Into<String>,
    ) -> Result<bool, RenameError> {
        let (old, new) = (old.into(), new.into());
        if old.is_empty() || new.is_empty() {
            return Err(RenameError::EmptyIdentifier { old, new });
        }
        if self.get(&old).is_some() || self.reserved.contains(&old) {
            return Err(RenameError::DuplicateIdentifier { old });
        }
        if old == new {
            self.reserved.push(old);
            return Ok(false);
        }
        self.pairs.push((old, new));
        Ok(true)
    }

    /// The new identifier for `old`, if mapped.
    #[must_use]
    pub fn get(&self, old: &str) -> Option<&str> {
        self.pairs
            .iter()
            .find(|(o, _)| o == old)
            .map(|(_, n)| n.as_str())
    }

    /// Pairs in insertion order.
    pub fn iter(&self) -> impl Iterator<Item = (&str, &str)> {
        self.pairs.iter().map(|(o, n)| (o.as_str(), n.as_str()))
    }

    /// Identifiers mapped to themselves, in insertion order.
    pub fn reserved(&self) -> impl Iterator<Item = &str> {
        self.reserved.iter().map(String::as_str)
    }

    /// Number of renaming pairs; reserved names are not counted.
    #[must_use]
    pub fn len(&self) -> usize {
        self.pairs.len()
    }

    /// Returns `true` if the map has no pairs.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.pairs.is_empty()
    }
}

impl Serialize for IdentifierMap {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        let mut map = serializer.serialize_map(Some(self.pairs.len() + self.reserved.len()))?;
        for (old, new) in &self.pairs {
            map.serialize_entry(old, new)?;
        }
        for name in &self.reserved {
            map.serialize_entry(name, name)?;
        }
        map.end()
    }
}

impl<'de> Deserialize<'de> for IdentifierMap {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        struct MapVisitor;

        impl<'de> Visitor<'de> for MapVisitor {
            type Value = IdentifierMap;

            fn expecting(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                f.write_str("an object of old identifier to new identifier")
            }

            fn visit_map<A: MapAccess<'de>>(self, mut access: A) -> Result<Self::Value, A::Error> {
                let mut map = IdentifierMap::new();
                while let Some((old, new)) = access.next_entry::<String, String>()? {
                    let _ = map.insert(old, new).map_err(de::Error::custom)?;
                }
                Ok(map)
            }
        }

        deserializer.deserialize_map(MapVisitor)
    }
}

/// A naming convention that gives one identifier a second textual form.
///
/// An identifier `base + suffix` renamed to `base + new_suffix` also has its
/// form `derived + suffix` renamed to `derived + new_suffix`. With an empty
/// `base` every identifier gets a derived form.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize)]
pub struct DerivedPrefix {
    /// Prefix of the base form, including any separator.
    pub base: String,
    /// Prefix of the derived form, including any separator.
    pub derived: String,
}

impl DerivedPrefix {
    /// Create a derived-prefix rule.
    #[must_use]
    pub fn new(base: impl Into<String>, derived: impl Into<String>) -> Self {
        Self {
            base: base.into(),
            derived: derived.into(),
        }
    }

    /// Component-class conventions of the page builder: each content element
    /// `<kind>-<id>` also appears as the class `c<kind>-<id>`, and each section
    /// as the background class `bg-section-<id>`.
    #[must_use]
    pub fn page_builder() -> Vec<Self> {
        [
            ("heading-", "cheading-"),
            ("sub-heading-", "csub-heading-"),
            ("image-", "cimage-"),
            ("video-", "cvideo-"),
            ("button-", "cbutton-"),
            ("divider-", "cdivider-"),
            ("paragraph-", "cparagraph-"),
            ("section-", "bg-section-"),
        ]
        .into_iter()
        .map(|(base, derived)| Self::new(base, derived))
        .collect()
    }

    /// The derived `(old, new)` forms of a pair, if both share the base prefix.
    #[must_use]
    pub fn apply(&self, old: &str, new: &str) -> Option<(String, String)> {
        let old_suffix = old.strip_prefix(self.base.as_str())?;
        let new_suffix = new.strip_prefix(self.base.as_str())?;
        if old_suffix.is_empty() || new_suffix.is_empty() {
            return None;
        }
        Some((
            format!("{}{old_suffix}", self.derived),
            format!("{}{new_suffix}", self.derived),
        ))
    }
}

impl FromStr for DerivedPrefix {
    type Err = RenameError;

    /// Parse `BASE=DERIVED`. `BASE` may be empty.
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.split_once('=') {
            Some((base, derived)) if !derived.is_empty() && base != derived => {
                Ok(Self::new(base, derived))
            }
            _ => Err(RenameError::InvalidDerivedPrefix {
                input: s.to_string(),
            }),
        }
    }
}
