//! Enums persisted as strings.

use gridx_core::auto_topup::Frequency;
use sea_orm::entity::prelude::*;
use serde::{Deserialize, Serialize};

/// Auto top-up cadence column.
#[derive(Debug, Clone, Copy, PartialEq, Eq, EnumIter, DeriveActiveEnum, Serialize, Deserialize)]
#[sea_orm(rs_type = "String", db_type = "String(StringLen::N(16))")]
#[serde(rename_all = "lowercase")]
pub enum TopUpFrequency {
    /// Every week.
    #[sea_orm(string_value = "weekly")]
    Weekly,
    /// Every month.
    #[sea_orm(string_value = "monthly")]
    Monthly,
    /// Every quarter.
    #[sea_orm(string_value = "quarterly")]
    Quarterly,
}

impl From<Frequency> for TopUpFrequency {
    fn from(value: Frequency) -> Self {
        match value {
            Frequency::Weekly => Self::Weekly,
            Frequency::Monthly => Self::Monthly,
            Frequency::Quarterly => Self::Quarterly,
        }
    }
}

impl From<TopUpFrequency> for Frequency {
    fn from(value: TopUpFrequency) -> Self {
        match value {
            TopUpFrequency::Weekly => Self::Weekly,
            TopUpFrequency::Monthly => Self::Monthly,
            TopUpFrequency::Quarterly => Self::Quarterly,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_frequency_roundtrips_through_column_enum() {
        for frequency in Frequency::ALL {
            let column = TopUpFrequency::from(frequency);
            assert_eq!(column.to_value(), frequency.as_str());
            assert_eq!(Frequency::from(column), frequency);
        }
    }
}
