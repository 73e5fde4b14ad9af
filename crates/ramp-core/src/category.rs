//! The eight fixed accessibility dimensions a review can rate.
//!
//! Every per-category table in the crate is a `[T; Category::COUNT]` indexed
//! by [`Category::index`], iterated in declaration order.

use std::str::FromStr;

use serde::{Deserialize, Deserializer, Serialize, Serializer};
use strum::{AsRefStr, EnumCount, EnumIter, EnumString, IntoEnumIterator as _};

use crate::Error;

/// An accessibility dimension.
///
/// The canonical string form is the document field prefix
/// (e.g. `mobility_accessibility`); parsing also accepts the short name
/// (e.g. `mobility`) in any ASCII case.
#[derive(
  Debug,
  Clone,
  Copy,
  PartialEq,
  Eq,
  PartialOrd,
  Ord,
  Hash,
  AsRefStr,
  EnumCount,
  EnumIter,
  EnumString,
)]
#[strum(ascii_case_insensitive)]
pub enum Category {
  #[strum(to_string = "mobility_accessibility", serialize = "mobility")]
  Mobility,
  #[strum(to_string = "cognitive_accessibility", serialize = "cognitive")]
  Cognitive,
  #[strum(to_string = "hearing_accessibility", serialize = "hearing")]
  Hearing,
  #[strum(to_string = "vision_accessibility", serialize = "vision")]
  Vision,
  #[strum(to_string = "bathroom_accessibility", serialize = "bathroom")]
  Bathroom,
  #[strum(to_string = "lgbtq_inclusivity", serialize = "lgbtq")]
  Lgbtq,
  #[strum(to_string = "sensory_considerations", serialize = "sensory")]
  Sensory,
  #[strum(to_string = "overall_inclusivity", serialize = "overall")]
  Overall,
}

impl Category {
  /// All categories in declaration order.
  pub fn all() -> impl Iterator<Item = Category> { Self::iter() }

  /// Position of this category in per-category tables.
  pub fn index(self) -> usize { self as usize }

  /// The document field prefix, e.g. `lgbtq_inclusivity`.
  pub fn prefix(self) -> &'static str {
    match self {
      Self::Mobility => "mobility_accessibility",
      Self::Cognitive => "cognitive_accessibility",
      Self::Hearing => "hearing_accessibility",
      Self::Vision => "vision_accessibility",
      Self::Bathroom => "bathroom_accessibility",
      Self::Lgbtq => "lgbtq_inclusivity",
      Self::Sensory => "sensory_considerations",
      Self::Overall => "overall_inclusivity",
    }
  }

  /// Human-readable label.
  pub fn display_name(self) -> &'static str {
    match self {
      Self::Mobility => "Mobility Accessibility",
      Self::Cognitive => "Cognitive Accessibility",
      Self::Hearing => "Hearing Accessibility",
      Self::Vision => "Vision Accessibility",
      Self::Bathroom => "Bathroom Accessibility",
      Self::Lgbtq => "LGBTQ+ Inclusivity",
      Self::Sensory => "Sensory Considerations",
      Self::Overall => "Overall Inclusivity",
    }
  }

  /// Review field holding the sub-feature map.
  pub fn dict_field(self) -> String { format!("{}_dict", self.prefix()) }

  /// Review and aggregate field holding the rating.
  pub fn rating_field(self) -> String { format!("{}_rating", self.prefix()) }

  /// Review field holding the free-text comment.
  pub fn text_field(self) -> String { format!("{}_text", self.prefix()) }

  /// Aggregate field holding the collected comments.
  pub fn texts_field(self) -> String { format!("{}_texts", self.prefix()) }

  /// Parse a comma-separated list such as `mobility,vision`.
  /// Blank entries are ignored.
  pub fn parse_list(s: &str) -> Result<Vec<Category>, Error> {
    s.split(',')
      .map(str::trim)
      .filter(|t| !t.is_empty())
      .map(|t| Category::from_str(t).map_err(|_| Error::UnknownCategory(t.to_owned())))
      .collect()
  }
}

impl Serialize for Category {
  fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
    serializer.serialize_str(self.prefix())
  }
}

impl<'de> Deserialize<'de> for Category {
  fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
    let raw = String::deserialize(deserializer)?;
    Category::from_str(&raw)
      .map_err(|_| serde::de::Error::custom(format!("unknown category {raw:?}")))
  }
}
