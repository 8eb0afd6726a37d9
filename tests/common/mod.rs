#![allow(dead_code)]

use std::fs;
use std::path::Path;

pub const HEADER: &str = "id,neighbourhood_group_cleansed,property_type,room_type,latitude,longitude,accommodates,bathrooms,bathrooms_text,bedrooms,beds,amenities,price";

const ROOM_TYPES: [&str; 4] = ["Shared room", "Private room", "Entire home/apt", "Hotel room"];
const BOROUGHS: [&str; 5] = ["Bronx", "Queens", "Staten Island", "Brooklyn", "Manhattan"];
const AMENITIES: [&str; 4] = [
    "TV, Wifi, Kitchen",
    "Heating, Elevator",
    "Air conditioning, Breakfast, Internet",
    "Wifi",
];

#[derive(Clone)]
pub struct RawRow {
    pub id: usize,
    pub property_type: String,
    pub bathrooms_text: String,
    pub price: String,
    pub amenities: String,
}

impl RawRow {
    pub fn new(id: usize) -> Self {
        let tier = id % 4;
        Self {
            id,
            property_type: "Entire rental unit".to_string(),
            bathrooms_text: format!("{} baths", 1.0 + tier as f64 * 0.5),
            price: ["$45.00", "$120.00", "$250.00", "$1,100.00"][tier].to_string(),
            amenities: AMENITIES[id % AMENITIES.len()].to_string(),
        }
    }

    fn to_csv_line(&self) -> String {
        let tier = self.id % 4;
        format!(
            "{},{},{},{},40.{},-73.{},{},,{},{},{},\"{}\",\"{}\"",
            self.id,
            BOROUGHS[self.id % BOROUGHS.len()],
            self.property_type,
            ROOM_TYPES[tier],
            700 + self.id,
            900 + self.id,
            1 + tier * 2,
            self.bathrooms_text,
            1 + tier,
            1 + tier,
            self.amenities,
            self.price,
        )
    }
}

pub fn rows(n: usize) -> Vec<RawRow> {
    (0..n).map(RawRow::new).collect()
}

pub fn write_raw_csv(path: &Path, rows: &[RawRow]) {
    let mut contents = String::from(HEADER);
    contents.push('\n');
    for row in rows {
        contents.push_str(&row.to_csv_line());
        contents.push('\n');
    }
    fs::write(path, contents).unwrap();
}
