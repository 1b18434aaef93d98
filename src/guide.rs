//! Seasonal and Soil-Type Guide Tables
//!
//! Static planting guidance shown next to the crop library:
//! - 4 seasons (months, recommended crops, common pests, tips, weather)
//! - 5 soil types (characteristics, suitable crops, pests with reasons, tips)
//!
//! Lookups by name are case-insensitive.

use serde::Serialize;

use crate::utils::text::eq_ignore_case;

#[derive(Debug, Clone, Copy, Serialize)]
pub struct Season {
    pub name: &'static str,
    pub months: &'static [&'static str],
    pub recommended_crops: &'static [&'static str],
    pub common_pests: &'static [&'static str],
    pub tips: &'static [&'static str],
    pub weather: &'static str,
}

/// A pest commonly found in a soil type, and why
#[derive(Debug, Clone, Copy, Serialize)]
pub struct SoilPest {
    pub name: &'static str,
    pub reason: &'static str,
}

#[derive(Debug, Clone, Copy, Serialize)]
pub struct SoilType {
    pub name: &'static str,
    pub characteristics: &'static [&'static str],
    pub suitable_crops: &'static [&'static str],
    pub common_pests: &'static [SoilPest],
    pub tips: &'static [&'static str],
}

// ============================================================================
// SEASONS
// ============================================================================

pub static SEASONS: &[Season] = &[
    Season {
        name: "Spring",
        months: &["March", "April", "May"],
        recommended_crops: &["Lettuce", "Spinach", "Peas", "Carrots", "Radishes"],
        common_pests: &["Aphids", "Cabbage Worms", "Cutworms"],
        tips: &[
            "Prepare soil with organic matter before planting",
            "Start seeds indoors for summer crops",
            "Monitor for early pest infestations",
            "Use row covers to protect seedlings",
        ],
        weather: "Spring brings fluctuating temperatures and increased rainfall. Be prepared with row covers for unexpected frost and ensure proper drainage to prevent waterlogging. This is the time to prepare soil with compost and organic matter before the main growing season begins.",
    },
    Season {
        name: "Summer",
        months: &["June", "July", "August"],
        recommended_crops: &["Tomatoes", "Peppers", "Cucumber", "Corn", "Beans"],
        common_pests: &["Spider Mites", "Japanese Beetles", "Squash Bugs"],
        tips: &[
            "Water deeply in the morning to avoid evaporation",
            "Use mulch to retain moisture and control weeds",
            "Harvest regularly to encourage production",
            "Monitor for heat stress in plants",
        ],
        weather: "Summer often brings heat waves and drought conditions. Focus on consistent watering practices, applying mulch to retain soil moisture, and providing shade for sensitive crops during extreme heat. Monitor for signs of heat stress and water early in the morning for best results.",
    },
    Season {
        name: "Fall",
        months: &["September", "October", "November"],
        recommended_crops: &["Kale", "Brussels Sprouts", "Cabbage", "Broccoli", "Cauliflower"],
        common_pests: &["Cabbage Loopers", "Aphids", "Slugs"],
        tips: &[
            "Plant cool-season crops for fall harvest",
            "Prepare for frost with covers when needed",
            "Clean up garden debris to reduce pest overwintering",
            "Amend soil with compost after final harvest",
        ],
        weather: "Fall brings cooling temperatures and potential early frosts. Begin preparing cold-hardy crops and have frost protection ready. Clean up summer crop debris to prevent disease and pest carryover. This is an excellent time to add compost and amendments to replenish soil after summer harvests.",
    },
    Season {
        name: "Winter",
        months: &["December", "January", "February"],
        recommended_crops: &["Garlic", "Winter Onions", "Some Leafy Greens"],
        common_pests: &["Stored Product Pests", "Rodents"],
        tips: &[
            "Plan next year's garden and crop rotation",
            "Order seeds and supplies",
            "Use cold frames or greenhouses for winter growing",
            "Protect perennials with mulch",
        ],
        weather: "Winter brings freezing temperatures and dormancy. Focus on protecting perennial plants and planning for the next growing season. Use this time to maintain tools, order seeds, and improve garden infrastructure. In warmer regions, some cold-tolerant crops can still be grown with appropriate protection.",
    },
];

// ============================================================================
// SOIL TYPES
// ============================================================================

pub static SOIL_TYPES: &[SoilType] = &[
    SoilType {
        name: "Clay",
        characteristics: &[
            "Heavy and compact when wet",
            "Slow-draining and retains moisture well",
            "Rich in nutrients but can be difficult to work",
            "Warms up slowly in spring",
        ],
        suitable_crops: &["Cabbage", "Broccoli", "Brussels Sprouts", "Beans", "Peas", "Summer Squash"],
        common_pests: &[
            SoilPest { name: "Slugs", reason: "Attracted to moist conditions" },
            SoilPest { name: "Root Maggots", reason: "Poor drainage creates favorable conditions" },
            SoilPest { name: "Wireworms", reason: "Thrive in heavy, wet soil" },
        ],
        tips: &[
            "Add organic matter to improve drainage and structure",
            "Avoid working soil when wet to prevent compaction",
            "Consider raised beds to improve drainage",
            "Mulch to maintain moisture in dry periods",
        ],
    },
    SoilType {
        name: "Sandy",
        characteristics: &[
            "Light and loose texture",
            "Drains quickly and warms up early in spring",
            "Low in nutrients that can wash away easily",
            "Requires frequent watering",
        ],
        suitable_crops: &["Carrots", "Radishes", "Potatoes", "Lettuce", "Strawberries", "Melons"],
        common_pests: &[
            SoilPest { name: "Nematodes", reason: "Thrive in warm, well-aerated soil" },
            SoilPest { name: "Carrot Rust Flies", reason: "Easily lay eggs in light soil" },
            SoilPest { name: "Cutworms", reason: "Can move easily through loose soil" },
        ],
        tips: &[
            "Add compost and organic matter to improve water retention",
            "Use mulch to conserve moisture and reduce watering needs",
            "Consider drip irrigation for efficient water use",
            "Fertilize regularly as nutrients leach quickly",
        ],
    },
    SoilType {
        name: "Loam",
        characteristics: &[
            "Balanced mixture of sand, silt, and clay",
            "Good drainage while retaining adequate moisture",
            "Nutrient-rich and easy to work with",
            "Ideal for most garden plants",
        ],
        suitable_crops: &["Tomatoes", "Peppers", "Corn", "Cucumbers", "Most vegetables and fruits"],
        common_pests: &[
            SoilPest { name: "Aphids", reason: "Attracted to healthy, vigorous plants" },
            SoilPest { name: "Tomato Hornworms", reason: "Common on nightshade family plants" },
            SoilPest { name: "Colorado Potato Beetles", reason: "Found where solanaceous crops grow well" },
        ],
        tips: &[
            "Maintain soil health with regular additions of compost",
            "Practice crop rotation to prevent pest buildup",
            "Use cover crops during off-seasons to add nutrients",
            "Minimal tillage to preserve soil structure",
        ],
    },
    SoilType {
        name: "Silt",
        characteristics: &[
            "Smooth, slippery texture when wet",
            "Holds moisture well but can become compacted",
            "Rich in nutrients but can form a crust when dry",
            "Medium drainage capability",
        ],
        suitable_crops: &["Leafy Greens", "Root Vegetables", "Perennial Vegetables", "Fruit Trees"],
        common_pests: &[
            SoilPest { name: "Snails", reason: "Thrive in moist conditions" },
            SoilPest { name: "Grubs", reason: "Enjoy the balanced moisture and nutrients" },
            SoilPest { name: "Fungus Gnats", reason: "Surface moisture creates breeding grounds" },
        ],
        tips: &[
            "Add organic matter to improve structure and prevent crusting",
            "Avoid walking on garden beds to prevent compaction",
            "Use mulch to prevent surface crusting",
            "Incorporate sand for better drainage if needed",
        ],
    },
    SoilType {
        name: "Peat",
        characteristics: &[
            "High organic content from decomposed plant material",
            "Acidic pH and excellent water retention",
            "Lightweight and spongy texture",
            "Slow to warm in spring",
        ],
        suitable_crops: &["Blueberries", "Cranberries", "Rhododendrons", "Acid-loving plants"],
        common_pests: &[
            SoilPest { name: "Fungus Gnats", reason: "Thrive in moist, organic conditions" },
            SoilPest { name: "Root Rots", reason: "Can develop in consistently wet conditions" },
            SoilPest { name: "Shore Flies", reason: "Attracted to algae that grows in wet peat" },
        ],
        tips: &[
            "Mix with mineral soils for balance if pure peat",
            "Consider liming if growing non-acid-loving plants",
            "Allow surface to dry slightly between waterings",
            "Add sand to improve drainage if needed",
        ],
    },
];

pub fn seasons() -> &'static [Season] {
    SEASONS
}

pub fn soil_types() -> &'static [SoilType] {
    SOIL_TYPES
}

/// Look up a season by name ("spring", "Summer", ...)
pub fn season(name: &str) -> Option<&'static Season> {
    SEASONS.iter().find(|s| eq_ignore_case(s.name, name.trim()))
}

/// Season containing a month given by its English name
pub fn season_for_month(month: &str) -> Option<&'static Season> {
    let month = month.trim();
    SEASONS
        .iter()
        .find(|s| s.months.iter().any(|m| eq_ignore_case(m, month)))
}

/// Look up a soil type by name ("clay", "Loam", ...)
pub fn soil_type(name: &str) -> Option<&'static SoilType> {
    SOIL_TYPES.iter().find(|s| eq_ignore_case(s.name, name.trim()))
}
