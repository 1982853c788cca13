//! Identifier types for cars, trains and crossings.

use std::borrow::Borrow;
use std::fmt;

use serde::{Deserialize, Serialize};

use super::DomainError;

/// Length of the transport suffix appended to a car's network identifier.
const NETWORK_SUFFIX_LEN: usize = 2;

/// Stable identifier of a single car.
///
/// # Examples
///
/// ```
/// use crossing_arbiter::domain::CarId;
///
/// let id = CarId::from_network_id("car-7#1").unwrap();
/// assert_eq!(id.as_str(), "car-7");
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct CarId(String);

impl CarId {
    /// Wrap an identifier as-is.
    pub fn new(id: impl Into<String>) -> Self {
        Self(id.into())
    }

    /// Derive the car identifier from a sender's network identifier.
    ///
    /// The transport appends a two-character suffix to every agent's
    /// network identifier; the car identifier is what remains once it is
    /// removed. The suffix content itself is not checked.
    pub fn from_network_id(network_id: &str) -> Result<Self, DomainError> {
        let chars = network_id.chars().count();
        if chars <= NETWORK_SUFFIX_LEN {
            return Err(DomainError::MalformedNetworkId(network_id.to_string()));
        }

        let stem: String = network_id.chars().take(chars - NETWORK_SUFFIX_LEN).collect();
        Ok(Self(stem))
    }

    /// Returns the identifier as a string slice.
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl Borrow<str> for CarId {
    fn borrow(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for CarId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// Index of a train, `0..train_count`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct TrainIndex(pub usize);

impl TrainIndex {
    /// Parse the train index encoded as the final character of a group label.
    ///
    /// Only the last character is read, so labels address trains 0 to 9.
    ///
    /// # Examples
    ///
    /// ```
    /// use crossing_arbiter::domain::TrainIndex;
    ///
    /// assert_eq!(TrainIndex::from_group_label("train1").unwrap(), TrainIndex(1));
    /// assert!(TrainIndex::from_group_label("train").is_err());
    /// ```
    pub fn from_group_label(label: &str) -> Result<Self, DomainError> {
        label
            .chars()
            .last()
            .and_then(|c| c.to_digit(10))
            .map(|d| TrainIndex(d as usize))
            .ok_or_else(|| DomainError::MalformedGroupLabel(label.to_string()))
    }

    /// Build the group label addressing this train.
    pub fn group_label(self, prefix: &str) -> String {
        format!("{prefix}{}", self.0)
    }
}

impl fmt::Display for TrainIndex {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "train {}", self.0)
    }
}

/// Position of a crossing in the ordered crossing list.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct CrossingId(pub usize);

impl fmt::Display for CrossingId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "crossing {}", self.0)
    }
}

/// Network identifier of an agent, used to address unicast replies.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ReplyAddress(String);

impl ReplyAddress {
    pub fn new(address: impl Into<String>) -> Self {
        Self(address.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for ReplyAddress {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn strip_network_suffix() {
        assert_eq!(CarId::from_network_id("abc#1").unwrap().as_str(), "abc");
        assert_eq!(CarId::from_network_id("x-12").unwrap().as_str(), "x-");
        assert_eq!(CarId::from_network_id("a00").unwrap().as_str(), "a");
    }

    #[test]
    fn reject_short_network_id() {
        assert!(CarId::from_network_id("").is_err());
        assert!(CarId::from_network_id("ab").is_err());
    }

    #[test]
    fn network_id_suffix_is_char_aware() {
        // Multibyte characters in the suffix must not split a code point
        assert_eq!(CarId::from_network_id("caré€").unwrap().as_str(), "car");
    }

    #[test]
    fn parse_group_label() {
        assert_eq!(TrainIndex::from_group_label("train0").unwrap(), TrainIndex(0));
        assert_eq!(TrainIndex::from_group_label("simu7").unwrap(), TrainIndex(7));
        assert_eq!(TrainIndex::from_group_label("9").unwrap(), TrainIndex(9));
    }

    #[test]
    fn group_label_reads_last_character_only() {
        assert_eq!(TrainIndex::from_group_label("train12").unwrap(), TrainIndex(2));
    }

    #[test]
    fn reject_malformed_group_label() {
        assert!(matches!(
            TrainIndex::from_group_label("train"),
            Err(DomainError::MalformedGroupLabel(label)) if label == "train"
        ));
        assert!(TrainIndex::from_group_label("").is_err());
        assert!(TrainIndex::from_group_label("train٣").is_err());
    }

    #[test]
    fn group_label_roundtrip() {
        let label = TrainIndex(4).group_label("train");
        assert_eq!(label, "train4");
        assert_eq!(TrainIndex::from_group_label(&label).unwrap(), TrainIndex(4));
    }

    #[test]
    fn display() {
        assert_eq!(TrainIndex(1).to_string(), "train 1");
        assert_eq!(CrossingId(3).to_string(), "crossing 3");
        assert_eq!(CarId::new("car-1").to_string(), "car-1");
    }
}
