//! Categorical encoding tables.
//!
//! Room type, neighbourhood and price category are closed sets known at
//! build time. Training and inference both go through these enums, so a
//! label always maps to the same code on either side.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::error::{PipelineError, Result};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum RoomType {
    SharedRoom,
    PrivateRoom,
    EntireHomeApt,
    HotelRoom,
}

impl RoomType {
    pub const DOMAIN: &'static str = "room type";

    pub const ALL: [RoomType; 4] = [
        RoomType::SharedRoom,
        RoomType::PrivateRoom,
        RoomType::EntireHomeApt,
        RoomType::HotelRoom,
    ];

    pub fn from_label(label: &str) -> Result<Self> {
        match label {
            "Shared room" => Ok(RoomType::SharedRoom),
            "Private room" => Ok(RoomType::PrivateRoom),
            "Entire home/apt" => Ok(RoomType::EntireHomeApt),
            "Hotel room" => Ok(RoomType::HotelRoom),
            _ => Err(PipelineError::UnknownLabel {
                domain: Self::DOMAIN,
                label: label.to_string(),
            }),
        }
    }

    pub fn label(self) -> &'static str {
        match self {
            RoomType::SharedRoom => "Shared room",
            RoomType::PrivateRoom => "Private room",
            RoomType::EntireHomeApt => "Entire home/apt",
            RoomType::HotelRoom => "Hotel room",
        }
    }

    pub fn from_code(code: i64) -> Result<Self> {
        match code {
            1 => Ok(RoomType::SharedRoom),
            2 => Ok(RoomType::PrivateRoom),
            3 => Ok(RoomType::EntireHomeApt),
            4 => Ok(RoomType::HotelRoom),
            _ => Err(PipelineError::UnknownCode {
                domain: Self::DOMAIN,
                code,
            }),
        }
    }

    pub fn code(self) -> i64 {
        match self {
            RoomType::SharedRoom => 1,
            RoomType::PrivateRoom => 2,
            RoomType::EntireHomeApt => 3,
            RoomType::HotelRoom => 4,
        }
    }
}

/// The five boroughs listings are grouped under.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Neighbourhood {
    Bronx,
    Queens,
    StatenIsland,
    Brooklyn,
    Manhattan,
}

impl Neighbourhood {
    pub const DOMAIN: &'static str = "neighbourhood";

    pub const ALL: [Neighbourhood; 5] = [
        Neighbourhood::Bronx,
        Neighbourhood::Queens,
        Neighbourhood::StatenIsland,
        Neighbourhood::Brooklyn,
        Neighbourhood::Manhattan,
    ];

    pub fn from_label(label: &str) -> Result<Self> {
        match label {
            "Bronx" => Ok(Neighbourhood::Bronx),
            "Queens" => Ok(Neighbourhood::Queens),
            "Staten Island" => Ok(Neighbourhood::StatenIsland),
            "Brooklyn" => Ok(Neighbourhood::Brooklyn),
            "Manhattan" => Ok(Neighbourhood::Manhattan),
            _ => Err(PipelineError::UnknownLabel {
                domain: Self::DOMAIN,
                label: label.to_string(),
            }),
        }
    }

    pub fn label(self) -> &'static str {
        match self {
            Neighbourhood::Bronx => "Bronx",
            Neighbourhood::Queens => "Queens",
            Neighbourhood::StatenIsland => "Staten Island",
            Neighbourhood::Brooklyn => "Brooklyn",
            Neighbourhood::Manhattan => "Manhattan",
        }
    }

    pub fn from_code(code: i64) -> Result<Self> {
        match code {
            1 => Ok(Neighbourhood::Bronx),
            2 => Ok(Neighbourhood::Queens),
            3 => Ok(Neighbourhood::StatenIsland),
            4 => Ok(Neighbourhood::Brooklyn),
            5 => Ok(Neighbourhood::Manhattan),
            _ => Err(PipelineError::UnknownCode {
                domain: Self::DOMAIN,
                code,
            }),
        }
    }

    pub fn code(self) -> i64 {
        match self {
            Neighbourhood::Bronx => 1,
            Neighbourhood::Queens => 2,
            Neighbourhood::StatenIsland => 3,
            Neighbourhood::Brooklyn => 4,
            Neighbourhood::Manhattan => 5,
        }
    }
}

/// Ordinal price bucket predicted by the classifier.
///
/// Codes match the bin labels produced by the cleaning pipeline.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub enum PriceCategory {
    Low,
    Mid,
    High,
    Lux,
}

impl PriceCategory {
    pub const DOMAIN: &'static str = "price category";

    pub const ALL: [PriceCategory; 4] = [
        PriceCategory::Low,
        PriceCategory::Mid,
        PriceCategory::High,
        PriceCategory::Lux,
    ];

    pub fn from_label(label: &str) -> Result<Self> {
        match label {
            "low" => Ok(PriceCategory::Low),
            "mid" => Ok(PriceCategory::Mid),
            "high" => Ok(PriceCategory::High),
            "lux" => Ok(PriceCategory::Lux),
            _ => Err(PipelineError::UnknownLabel {
                domain: Self::DOMAIN,
                label: label.to_string(),
            }),
        }
    }

    pub fn label(self) -> &'static str {
        match self {
            PriceCategory::Low => "low",
            PriceCategory::Mid => "mid",
            PriceCategory::High => "high",
            PriceCategory::Lux => "lux",
        }
    }

    pub fn from_code(code: i64) -> Result<Self> {
        match code {
            0 => Ok(PriceCategory::Low),
            1 => Ok(PriceCategory::Mid),
            2 => Ok(PriceCategory::High),
            3 => Ok(PriceCategory::Lux),
            _ => Err(PipelineError::UnknownCode {
                domain: Self::DOMAIN,
                code,
            }),
        }
    }

    pub fn code(self) -> i64 {
        match self {
            PriceCategory::Low => 0,
            PriceCategory::Mid => 1,
            PriceCategory::High => 2,
            PriceCategory::Lux => 3,
        }
    }
}

macro_rules! label_traits {
    ($($ty:ty),*) => {
        $(
            impl FromStr for $ty {
                type Err = PipelineError;

                fn from_str(s: &str) -> Result<Self> {
                    Self::from_label(s)
                }
            }

            impl fmt::Display for $ty {
                fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                    f.write_str(self.label())
                }
            }
        )*
    };
}

label_traits!(RoomType, Neighbourhood, PriceCategory);
