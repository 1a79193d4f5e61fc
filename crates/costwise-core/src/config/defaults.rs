// Single source of truth for all default values.

// --- Regions ---
pub const DEFAULT_REGION_ALLOWLIST: &[&str] = &[
    "Dubai",
    "Abu Dhabi",
    "Sharjah",
    "Ajman",
    "Ras Al Khaimah",
    "Fujairah",
    "Umm Al Quwain",
];

// --- Recency ---
pub const DEFAULT_FRESH_DAYS: u32 = 30;
pub const DEFAULT_STALE_DAYS: u32 = 90;
pub const DEFAULT_RECENCY_FLOOR: f64 = 0.5;

// --- Sample size ---
pub const DEFAULT_CONFIDENCE_SATURATION_N: u32 = 20;

// --- Execution ---
/// 0 = use the shared rayon pool.
pub const DEFAULT_WORKER_THREADS: usize = 0;

// --- Persona map ---
pub const DEFAULT_SUB_CATEGORY_WEIGHT: f64 = 1.0;
