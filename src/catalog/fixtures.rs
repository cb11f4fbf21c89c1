//! Compiled-in fleet, city and add-on data for the storefront.

use super::models::{AddOnFacility, City, Vehicle, VehicleCategory};

const REGION: &str = "Andhra Pradesh";

const CITY_NAMES: [&str; 12] = [
    "Vijayawada",
    "Visakhapatnam",
    "Guntur",
    "Nellore",
    "Kurnool",
    "Rajahmundry",
    "Tirupati",
    "Anantapur",
    "Kadapa",
    "Eluru",
    "Chittoor",
    "Machilipatnam",
];

pub fn cities() -> Vec<City> {
    CITY_NAMES
        .iter()
        .enumerate()
        .map(|(i, name)| City {
            id: (i + 1).to_string(),
            name: name.to_string(),
            region: REGION.to_string(),
        })
        .collect()
}

fn vehicle(
    id: &str,
    name: &str,
    image_url: &str,
    price_per_day: u64,
    facilities: &[&str],
    category: VehicleCategory,
) -> Vehicle {
    Vehicle {
        id: id.to_string(),
        name: name.to_string(),
        model: "2023".to_string(),
        image_url: image_url.to_string(),
        price_per_day,
        facilities: facilities.iter().map(|f| f.to_string()).collect(),
        category,
        available: true,
    }
}

pub fn vehicles() -> Vec<Vehicle> {
    vec![
        vehicle(
            "1",
            "Maruti Swift",
            "https://images.unsplash.com/photo-1502877338535-766e1452684a?w=600&h=400&fit=crop",
            1200,
            &["AC", "Music System", "GPS"],
            VehicleCategory::Hatchback,
        ),
        vehicle(
            "2",
            "Honda City",
            "https://images.unsplash.com/photo-1549924231-f129b911e442?w=600&h=400&fit=crop",
            1800,
            &["AC", "Music System", "GPS", "Leather Seats"],
            VehicleCategory::Sedan,
        ),
        vehicle(
            "3",
            "Toyota Innova",
            "https://images.unsplash.com/photo-1494905998402-395d579af36f?w=600&h=400&fit=crop",
            2500,
            &["AC", "Music System", "GPS", "7 Seater", "USB Charging"],
            VehicleCategory::Suv,
        ),
        vehicle(
            "4",
            "Hyundai Creta",
            "https://images.unsplash.com/photo-1600712242805-5f78671b24da?w=600&h=400&fit=crop",
            2200,
            &["AC", "Music System", "GPS", "Sunroof", "Reverse Camera"],
            VehicleCategory::Suv,
        ),
        vehicle(
            "5",
            "Mahindra XUV700",
            "https://images.unsplash.com/photo-1583121274602-3e2820c69888?w=600&h=400&fit=crop",
            3000,
            &["AC", "Music System", "GPS", "7 Seater", "Premium Audio", "Sunroof"],
            VehicleCategory::Suv,
        ),
        vehicle(
            "6",
            "Tata Nexon",
            "https://images.unsplash.com/photo-1605559424843-9e4c228bf1c2?w=600&h=400&fit=crop",
            1600,
            &["AC", "Music System", "GPS", "Safety Features"],
            VehicleCategory::CompactSuv,
        ),
    ]
}

pub fn add_on_facilities() -> Vec<AddOnFacility> {
    [
        ("1", "Driver", 500),
        ("2", "Extra Insurance", 200),
        ("3", "Child Seat", 100),
        ("4", "GPS Navigation", 150),
        ("5", "Phone Charger", 50),
    ]
    .into_iter()
    .map(|(id, name, price)| AddOnFacility {
        id: id.to_string(),
        name: name.to_string(),
        price,
    })
    .collect()
}
