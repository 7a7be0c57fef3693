//! Bundled option lists for enumerated fields

pub const LANGUAGES: &[&str] = &[
    "Hindi", "English", "Punjabi", "Marathi", "Gujarati", "Bengali", "Tamil", "Telugu", "Kannada",
];

pub const SOIL_TYPES: &[&str] = &[
    "Alluvial", "Black", "Red", "Laterite", "Arid", "Loamy", "Clay", "Sandy",
];

pub const CROPS: &[&str] = &[
    "Rice", "Wheat", "Maize", "Sugarcane", "Cotton", "Mustard", "Barley", "Pulses",
];

pub const BUSINESS_TYPES: &[&str] = &[
    "Biomass Power Plant",
    "Paper & Pulp",
    "Biofuel / Ethanol",
    "Packaging",
    "Compost & Fertilizer",
    "Animal Feed",
    "Other",
];

pub const STUBBLE_TYPES: &[&str] = &[
    "Paddy Straw", "Wheat Straw", "Maize Stalks", "Sugarcane Trash", "Cotton Stalks",
];
