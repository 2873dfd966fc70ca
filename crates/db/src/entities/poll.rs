//! Poll entity.
//!
//! Vote counters live in the `vote_slot` table (one row per option) so
//! concurrent submissions increment atomically; opinion polls accumulate
//! `opinion_response` rows instead and own no slots.

use sea_orm::entity::prelude::*;
use serde::{Deserialize, Serialize};
use serde_json::Value as JsonValue;

/// Poll question types.
#[derive(Debug, Clone, Copy, PartialEq, Eq, EnumIter, DeriveActiveEnum, Serialize, Deserialize)]
#[sea_orm(rs_type = "String", db_type = "String(StringLen::N(16))")]
#[serde(rename_all = "snake_case")]
#[derive(Default)]
pub enum PollType {
    /// One option per submission.
    #[sea_orm(string_value = "single_choice")]
    #[default]
    SingleChoice,
    /// Several options per submission.
    #[sea_orm(string_value = "multi_choice")]
    MultiChoice,
    /// A rating scale; each option is one notch.
    #[sea_orm(string_value = "slide")]
    Slide,
    /// Free-text responses; no counters.
    #[sea_orm(string_value = "opinion")]
    Opinion,
}

impl PollType {
    /// Minimum number of options this type requires.
    #[must_use]
    pub const fn min_options(self) -> usize {
        match self {
            Self::Slide | Self::Opinion => 1,
            Self::SingleChoice | Self::MultiChoice => 2,
        }
    }

    /// Number of vote counters backing a poll with `option_count` options.
    ///
    /// Opinion polls carry no counters at all; their single logical slot
    /// is the free-text response list.
    #[must_use]
    pub const fn vote_slots(self, option_count: usize) -> usize {
        match self {
            Self::Opinion => 0,
            _ => option_count,
        }
    }

    /// Whether this type collects free text instead of counters.
    #[must_use]
    pub const fn is_opinion(self) -> bool {
        matches!(self, Self::Opinion)
    }

    /// Parse a poll type from client input. A blank value defaults to
    /// `single_choice`; anything outside the closed set is rejected.
    pub fn parse(value: &str) -> Result<Self, String> {
        match value.trim().to_lowercase().as_str() {
            "" | "single_choice" => Ok(Self::SingleChoice),
            "multi_choice" => Ok(Self::MultiChoice),
            "slide" => Ok(Self::Slide),
            "opinion" => Ok(Self::Opinion),
            other => Err(format!("invalid poll type: {other}")),
        }
    }

    /// Stable wire name of this type.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::SingleChoice => "single_choice",
            Self::MultiChoice => "multi_choice",
            Self::Slide => "slide",
            Self::Opinion => "opinion",
        }
    }
}

#[derive(Clone, Debug, PartialEq, Eq, DeriveEntityModel, Serialize, Deserialize)]
#[sea_orm(table_name = "poll")]
pub struct Model {
    #[sea_orm(primary_key, auto_increment = false)]
    pub id: String,

    /// Owning sheet. Never reassigned after creation.
    pub sheet_id: String,

    pub title: String,

    #[sea_orm(column_type = "Text")]
    pub description: String,

    /// Option labels (JSON array of strings), ordered
    #[sea_orm(column_type = "JsonBinary")]
    pub options: JsonValue,

    /// Category tags (JSON array of strings), deduplicated
    #[sea_orm(column_type = "JsonBinary")]
    pub categories: JsonValue,

    pub poll_type: PollType,

    /// Accepted submissions, one per respondent call
    #[sea_orm(default_value = 0)]
    pub participant_count: i32,

    pub created_at: DateTimeWithTimeZone,

    #[sea_orm(nullable)]
    pub updated_at: Option<DateTimeWithTimeZone>,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {
    #[sea_orm(
        belongs_to = "super::sheet::Entity",
        from = "Column::SheetId",
        to = "super::sheet::Column::Id",
        on_delete = "Cascade"
    )]
    Sheet,

    #[sea_orm(has_many = "super::vote_slot::Entity")]
    VoteSlots,

    #[sea_orm(has_many = "super::opinion_response::Entity")]
    OpinionResponses,
}

impl Related<super::sheet::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Sheet.def()
    }
}

impl Related<super::vote_slot::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::VoteSlots.def()
    }
}

impl Related<super::opinion_response::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::OpinionResponses.def()
    }
}

impl ActiveModelBehavior for ActiveModel {}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_min_options_per_type() {
        assert_eq!(PollType::SingleChoice.min_options(), 2);
        assert_eq!(PollType::MultiChoice.min_options(), 2);
        assert_eq!(PollType::Slide.min_options(), 1);
        assert_eq!(PollType::Opinion.min_options(), 1);
    }

    #[test]
    fn test_vote_slots_track_option_count() {
        assert_eq!(PollType::SingleChoice.vote_slots(4), 4);
        assert_eq!(PollType::Slide.vote_slots(10), 10);
        assert_eq!(PollType::Opinion.vote_slots(3), 0);
    }

    #[test]
    fn test_parse_blank_defaults_to_single_choice() {
        assert_eq!(PollType::parse("").ok(), Some(PollType::SingleChoice));
        assert_eq!(PollType::parse("  ").ok(), Some(PollType::SingleChoice));
    }

    #[test]
    fn test_parse_rejects_unknown_type() {
        assert!(PollType::parse("ranked_choice").is_err());
    }

    #[test]
    fn test_parse_is_case_insensitive() {
        assert_eq!(PollType::parse("Multi_Choice").ok(), Some(PollType::MultiChoice));
    }
}
