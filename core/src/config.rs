//! Typed configuration for the whole pipeline.
//!
//! RULE: The catalog is static and versioned. Every distribution a
//! generator reads lives here as an explicitly-typed structure built by
//! `GenConfig::default()` — no ad hoc dicts, no implicit global state.
//! Weight tables are ordered; reordering entries changes sampling and
//! is a breaking change.

use crate::catalog::{DecisionArm, DecisionTable, ParamDist, WeightedTable};
use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

/// Catalog schema version, recorded in the output manifest.
pub const CATALOG_VERSION: &str = "1.0.0";

/// Default master seed when the CLI does not override it.
pub const DEFAULT_SEED: u64 = 42;

fn table(name: &str, pairs: &[(&str, f64)]) -> WeightedTable {
    WeightedTable::from_pairs(name, pairs).expect("static catalog table is non-empty")
}

// ── Geography ────────────────────────────────────────────────────────────────

/// Census-style region grouping. Carries the regional adjustment
/// constants the derived-attribute formulas use.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Region {
    West,
    Southwest,
    Northeast,
    Southeast,
    Midwest,
}

impl Region {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::West => "West",
            Self::Southwest => "Southwest",
            Self::Northeast => "Northeast",
            Self::Southeast => "Southeast",
            Self::Midwest => "Midwest",
        }
    }

    /// Multiplier applied to the national median income.
    pub fn income_multiplier(&self) -> f64 {
        match self {
            Self::West => 1.1,
            Self::Northeast => 1.15,
            Self::Midwest => 0.95,
            Self::Southeast => 0.90,
            Self::Southwest => 1.0,
        }
    }

    /// Regional cost-of-living baseline (index points).
    pub fn cost_of_living_base(&self) -> f64 {
        match self {
            Self::West => 115.0,
            Self::Northeast => 120.0,
            Self::Southeast => 90.0,
            Self::Midwest => 88.0,
            Self::Southwest => 95.0,
        }
    }

    /// Additive unemployment adjustment (percentage points).
    pub fn unemployment_adjustment(&self) -> f64 {
        match self {
            Self::West => -0.3,
            Self::Northeast => 0.2,
            Self::Southeast => 0.5,
            Self::Midwest => 0.3,
            Self::Southwest => 0.1,
        }
    }
}

/// Urban/rural classification of a zone. Carries the class-specific
/// population, land-area, and income constants.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum UrbanClass {
    Urban,
    Suburban,
    Rural,
    Remote,
}

impl UrbanClass {
    pub const ALL: [UrbanClass; 4] =
        [Self::Urban, Self::Suburban, Self::Rural, Self::Remote];

    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Urban => "Urban",
            Self::Suburban => "Suburban",
            Self::Rural => "Rural",
            Self::Remote => "Remote",
        }
    }

    pub fn from_str(s: &str) -> Option<Self> {
        Self::ALL.iter().copied().find(|c| c.as_str() == s)
    }

    /// (mean, std) of zone population.
    pub fn population_params(&self) -> (f64, f64) {
        match self {
            Self::Urban => (50_000.0, 25_000.0),
            Self::Suburban => (20_000.0, 15_000.0),
            Self::Rural => (3_000.0, 2_000.0),
            Self::Remote => (500.0, 400.0),
        }
    }

    /// (mean, std) of zone land area in square miles.
    pub fn land_area_params(&self) -> (f64, f64) {
        match self {
            Self::Urban => (5.0, 3.0),
            Self::Suburban => (20.0, 15.0),
            Self::Rural => (100.0, 80.0),
            Self::Remote => (500.0, 400.0),
        }
    }

    /// Multiplier applied to the national median income.
    pub fn income_multiplier(&self) -> f64 {
        match self {
            Self::Urban => 1.2,
            Self::Suburban => 1.1,
            Self::Rural => 0.85,
            Self::Remote => 0.75,
        }
    }

    /// Additive cost-of-living adjustment (index points).
    pub fn cost_of_living_adjustment(&self) -> f64 {
        match self {
            Self::Urban => 20.0,
            Self::Suburban => 5.0,
            Self::Rural => -10.0,
            Self::Remote => -15.0,
        }
    }
}

/// One state's slice of the geography catalog: population weight,
/// region, and the DMAs its zones may belong to.
#[derive(Debug, Clone)]
pub struct StateEntry {
    pub code: &'static str,
    pub weight: f64,
    pub region: Region,
    pub dmas: &'static [&'static str],
}

/// One seeded designated market area: code, display name, and baseline
/// subscriber count used by the competitive generator.
#[derive(Debug, Clone)]
pub struct DmaSeed {
    pub code: &'static str,
    pub name: &'static str,
    pub base_subs: u64,
}

// ── Plans and devices ────────────────────────────────────────────────────────

/// Billing category of a plan.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum PlanCategory {
    Prepaid,
    Postpaid,
}

impl PlanCategory {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Prepaid => "Prepaid",
            Self::Postpaid => "Postpaid",
        }
    }
}

/// One rate plan. `min_lines`/`max_lines` above 1 marks the family
/// plan whose line-count rule is a hard business constraint.
#[derive(Debug, Clone)]
pub struct PlanSpec {
    pub name: &'static str,
    pub price: f64,
    pub category: PlanCategory,
    pub data_gb: u32,
    pub weight: f64,
    pub contract_types: &'static [&'static str],
    pub arpu_range: (f64, f64),
    pub min_lines: u32,
    pub max_lines: u32,
    pub data_usage: DataUsageSpec,
    pub voice_usage: (f64, f64),
}

/// Monthly data-usage parameters for one plan.
#[derive(Debug, Clone, Copy)]
pub struct DataUsageSpec {
    pub mean: f64,
    pub std: f64,
    pub max: f64,
}

impl PlanSpec {
    /// Limited-allowance plans accrue overage and can be throttled;
    /// 999 GB is the unlimited sentinel.
    pub fn is_limited(&self) -> bool {
        self.data_gb < 999
    }
}

/// One handset brand with its model list and tier mix.
#[derive(Debug, Clone)]
pub struct DeviceBrand {
    pub name: &'static str,
    pub weight: f64,
    pub os: &'static str,
    pub models: &'static [&'static str],
    pub tiers: WeightedTable,
}

// ── Campaigns ────────────────────────────────────────────────────────────────

/// Funnel parameters for one campaign type.
#[derive(Debug, Clone)]
pub struct CampaignTypeSpec {
    pub name: &'static str,
    pub weight: f64,
    pub response_rate: f64,
    pub conversion_rate: f64,
}

/// Context for the campaign-type decision table.
#[derive(Debug, Clone, Copy)]
pub struct CampaignProfile {
    pub churn_risk: f64,
    pub arpu: f64,
}

// ── Lifestyle ────────────────────────────────────────────────────────────────

/// The ten psychographic clusters.
pub const LIFESTYLE_CLUSTERS: [&str; 10] = [
    "Urban Tech Elite",
    "Suburban Family Focus",
    "Budget Maximizers",
    "Silver Streamers",
    "Rural Reliability",
    "Young & Mobile",
    "Small Biz Hustlers",
    "Connected Seniors",
    "Digital Minimalists",
    "Premium Professionals",
];

/// (mean, std) of the tech-adoption score for a cluster.
pub fn tech_adoption_params(cluster: &str) -> (f64, f64) {
    match cluster {
        "Urban Tech Elite" => (85.0, 8.0),
        "Suburban Family Focus" => (60.0, 12.0),
        "Budget Maximizers" => (45.0, 15.0),
        "Silver Streamers" => (50.0, 15.0),
        "Rural Reliability" => (40.0, 15.0),
        "Young & Mobile" => (80.0, 10.0),
        "Small Biz Hustlers" => (65.0, 12.0),
        "Connected Seniors" => (45.0, 18.0),
        "Digital Minimalists" => (25.0, 12.0),
        "Premium Professionals" => (75.0, 10.0),
        _ => (50.0, 15.0),
    }
}

// ── Churn ────────────────────────────────────────────────────────────────────

/// Weights of the churn-risk linear combination. This is the single
/// most load-bearing derived-value formula in the pipeline; downstream
/// "high churn risk" segmentation depends on its term set and clipping.
#[derive(Debug, Clone, Copy, Serialize, Deserialize)]
pub struct ChurnRiskWeights {
    pub base_risk: f64,
    pub tenure_factor: f64,
    pub complaint_factor: f64,
    pub competitor_intensity_factor: f64,
    pub price_sensitivity_factor: f64,
    pub prepaid_plan_factor: f64,
    pub noise_std: f64,
    pub floor: f64,
    pub ceiling: f64,
}

// ── Top-level config ─────────────────────────────────────────────────────────

/// Everything the pipeline needs, bundled. Immutable after construction;
/// generators receive it by shared reference.
pub struct GenConfig {
    // Record counts
    pub total_customers: usize,
    pub months_of_usage: u32,
    pub avg_interactions_per_customer: f64,
    pub avg_campaigns_per_customer: f64,
    pub zones: usize,
    pub dmas: usize,

    /// All dates are derived from this fixed day, never wall clock, so
    /// equal seeds yield byte-identical output on any day.
    pub snapshot_date: NaiveDate,

    // Geography
    pub states: Vec<StateEntry>,
    pub urban_rural: WeightedTable,
    pub national_median_income: f64,
    pub income_clamp: (f64, f64),

    // Customer demographics
    pub age_buckets: Vec<AgeBucket>,
    pub gender: WeightedTable,
    pub acquisition_channels: WeightedTable,

    // Plans and devices
    pub plans: Vec<PlanSpec>,
    pub plan_by_age: DecisionTable<i64>,
    pub device_brands: Vec<DeviceBrand>,
    pub device_by_plan: DecisionTable<String>,
    pub credit_by_plan: DecisionTable<String>,
    pub payment_by_plan: DecisionTable<String>,
    pub churn_reason: WeightedTable,
    pub churn_weights: ChurnRiskWeights,

    // Usage
    pub seasonal_factors: [f64; 12],
    pub usage_trend: WeightedTable,
    pub payment_status_by_credit: DecisionTable<String>,

    // Interactions
    pub support_channels_by_age: DecisionTable<i64>,
    pub support_categories_by_risk: DecisionTable<f64>,
    pub resolution_by_category: DecisionTable<String>,
    pub csat_by_sentiment: DecisionTable<f64>,

    // Campaigns
    pub campaign_types: Vec<CampaignTypeSpec>,
    pub campaign_type_by_profile: DecisionTable<CampaignProfile>,
    pub campaign_channels: WeightedTable,

    // Competitive landscape
    pub dma_seeds: Vec<DmaSeed>,
    pub carrier_share: Vec<(&'static str, ParamDist)>,
    pub carrier_price: Vec<(&'static str, ParamDist)>,

    // Lifestyle
    pub lifestyle_by_geography: Vec<(UrbanClass, WeightedTable)>,

    // Economic
    pub cost_of_living: ParamDist,
    pub unemployment: ParamDist,
    pub credit_score: ParamDist,
}

/// One age bucket of the customer age distribution.
#[derive(Debug, Clone)]
pub struct AgeBucket {
    pub label: &'static str,
    pub weight: f64,
    pub min: i64,
    pub max: i64,
}

impl GenConfig {
    pub fn plan(&self, name: &str) -> &PlanSpec {
        self.plans
            .iter()
            .find(|p| p.name == name)
            .unwrap_or(&self.plans[2]) // mid-tier fallback, documented
    }

    pub fn campaign_type(&self, name: &str) -> &CampaignTypeSpec {
        self.campaign_types
            .iter()
            .find(|t| t.name == name)
            .unwrap_or(&self.campaign_types[0])
    }

    pub fn device_brand(&self, name: &str) -> &DeviceBrand {
        self.device_brands
            .iter()
            .find(|b| b.name == name)
            .unwrap_or(&self.device_brands[0])
    }

    /// Table of lifestyle clusters for an urban class.
    pub fn lifestyle_table(&self, class: UrbanClass) -> &WeightedTable {
        self.lifestyle_by_geography
            .iter()
            .find(|(c, _)| *c == class)
            .map(|(_, t)| t)
            .expect("all urban classes carry a lifestyle table")
    }
}

impl Default for GenConfig {
    fn default() -> Self {
        use Region::*;

        let states = vec![
            StateEntry { code: "CA", weight: 0.118, region: West, dmas: &["803", "807", "825"] },
            StateEntry { code: "TX", weight: 0.088, region: Southwest, dmas: &["623", "618", "641"] },
            StateEntry { code: "FL", weight: 0.066, region: Southeast, dmas: &["528", "539", "534", "548", "561"] },
            StateEntry { code: "NY", weight: 0.059, region: Northeast, dmas: &["501", "532"] },
            StateEntry { code: "PA", weight: 0.039, region: Northeast, dmas: &["504", "508", "577", "566"] },
            StateEntry { code: "IL", weight: 0.038, region: Midwest, dmas: &["602"] },
            StateEntry { code: "OH", weight: 0.035, region: Midwest, dmas: &["510", "515", "525", "542"] },
            StateEntry { code: "GA", weight: 0.033, region: Southeast, dmas: &["524"] },
            StateEntry { code: "NC", weight: 0.032, region: Southeast, dmas: &["560", "517", "518"] },
            StateEntry { code: "MI", weight: 0.030, region: Midwest, dmas: &["505", "563"] },
            StateEntry { code: "NJ", weight: 0.028, region: Northeast, dmas: &["501"] },
            StateEntry { code: "VA", weight: 0.026, region: Southeast, dmas: &["544", "511"] },
            StateEntry { code: "WA", weight: 0.024, region: West, dmas: &["819", "881"] },
            StateEntry { code: "AZ", weight: 0.023, region: Southwest, dmas: &["753"] },
            StateEntry { code: "MA", weight: 0.021, region: Northeast, dmas: &["506"] },
            StateEntry { code: "TN", weight: 0.021, region: Southeast, dmas: &["659", "640", "557"] },
            StateEntry { code: "IN", weight: 0.020, region: Midwest, dmas: &["527"] },
            StateEntry { code: "MD", weight: 0.019, region: Northeast, dmas: &["512", "511"] },
            StateEntry { code: "MO", weight: 0.018, region: Midwest, dmas: &["609"] },
            StateEntry { code: "CO", weight: 0.018, region: West, dmas: &["751"] },
            StateEntry { code: "WI", weight: 0.017, region: Midwest, dmas: &["617"] },
            StateEntry { code: "MN", weight: 0.017, region: Midwest, dmas: &["613"] },
            StateEntry { code: "SC", weight: 0.016, region: Southeast, dmas: &["546", "545"] },
            StateEntry { code: "AL", weight: 0.015, region: Southeast, dmas: &["630", "691", "686"] },
            StateEntry { code: "LA", weight: 0.014, region: Southeast, dmas: &["622"] },
            StateEntry { code: "KY", weight: 0.013, region: Southeast, dmas: &["541", "540"] },
            StateEntry { code: "OR", weight: 0.013, region: West, dmas: &["820", "813"] },
            StateEntry { code: "OK", weight: 0.012, region: Southwest, dmas: &["650"] },
            StateEntry { code: "CT", weight: 0.011, region: Northeast, dmas: &["533"] },
            StateEntry { code: "UT", weight: 0.010, region: West, dmas: &["770"] },
            StateEntry { code: "NV", weight: 0.010, region: West, dmas: &["839"] },
            StateEntry { code: "IA", weight: 0.009, region: Midwest, dmas: &["679"] },
            StateEntry { code: "AR", weight: 0.009, region: Southeast, dmas: &["693"] },
            StateEntry { code: "MS", weight: 0.009, region: Southeast, dmas: &["718"] },
            StateEntry { code: "KS", weight: 0.009, region: Midwest, dmas: &["678"] },
            StateEntry { code: "NM", weight: 0.006, region: Southwest, dmas: &["790"] },
            StateEntry { code: "NE", weight: 0.006, region: Midwest, dmas: &["652"] },
            StateEntry { code: "ID", weight: 0.006, region: West, dmas: &["757"] },
            StateEntry { code: "WV", weight: 0.005, region: Southeast, dmas: &["564"] },
            StateEntry { code: "HI", weight: 0.004, region: West, dmas: &["744"] },
            StateEntry { code: "NH", weight: 0.004, region: Northeast, dmas: &["506"] },
            StateEntry { code: "ME", weight: 0.004, region: Northeast, dmas: &["500"] },
            StateEntry { code: "MT", weight: 0.003, region: West, dmas: &["762"] },
            StateEntry { code: "RI", weight: 0.003, region: Northeast, dmas: &["521"] },
            StateEntry { code: "DE", weight: 0.003, region: Northeast, dmas: &["504"] },
            StateEntry { code: "SD", weight: 0.003, region: Midwest, dmas: &["725"] },
            StateEntry { code: "ND", weight: 0.002, region: Midwest, dmas: &["724"] },
            StateEntry { code: "AK", weight: 0.002, region: West, dmas: &["743"] },
            StateEntry { code: "VT", weight: 0.002, region: Northeast, dmas: &["523"] },
            StateEntry { code: "WY", weight: 0.002, region: West, dmas: &["767"] },
            StateEntry { code: "DC", weight: 0.002, region: Northeast, dmas: &["511"] },
        ];

        let urban_rural = table(
            "urban_rural",
            &[("Urban", 0.30), ("Suburban", 0.50), ("Rural", 0.18), ("Remote", 0.02)],
        );

        let age_buckets = vec![
            AgeBucket { label: "18-24", weight: 0.12, min: 18, max: 24 },
            AgeBucket { label: "25-34", weight: 0.22, min: 25, max: 34 },
            AgeBucket { label: "35-44", weight: 0.20, min: 35, max: 44 },
            AgeBucket { label: "45-54", weight: 0.18, min: 45, max: 54 },
            AgeBucket { label: "55-64", weight: 0.15, min: 55, max: 64 },
            AgeBucket { label: "65+", weight: 0.13, min: 65, max: 85 },
        ];

        let gender = table(
            "gender",
            &[("M", 0.48), ("F", 0.50), ("Other", 0.01), ("Unknown", 0.01)],
        );

        let acquisition_channels = table(
            "acquisition_channel",
            &[
                ("Retail Store", 0.35),
                ("Online", 0.30),
                ("Telesales", 0.15),
                ("Partner", 0.12),
                ("Referral", 0.08),
            ],
        );

        let plans = vec![
            PlanSpec {
                name: "Glacier",
                price: 25.0,
                category: PlanCategory::Prepaid,
                data_gb: 2,
                weight: 0.12,
                contract_types: &["NoContract"],
                arpu_range: (20.0, 35.0),
                min_lines: 1,
                max_lines: 1,
                data_usage: DataUsageSpec { mean: 1.5, std: 0.5, max: 2.5 },
                voice_usage: (100.0, 50.0),
            },
            PlanSpec {
                name: "Flurry",
                price: 35.0,
                category: PlanCategory::Postpaid,
                data_gb: 5,
                weight: 0.15,
                contract_types: &["NoContract", "12M"],
                arpu_range: (30.0, 50.0),
                min_lines: 1,
                max_lines: 1,
                data_usage: DataUsageSpec { mean: 3.5, std: 1.5, max: 6.0 },
                voice_usage: (150.0, 80.0),
            },
            PlanSpec {
                name: "Powder",
                price: 55.0,
                category: PlanCategory::Postpaid,
                data_gb: 15,
                weight: 0.30,
                contract_types: &["NoContract", "12M", "24M", "DevicePayment"],
                arpu_range: (45.0, 75.0),
                min_lines: 1,
                max_lines: 1,
                data_usage: DataUsageSpec { mean: 10.0, std: 5.0, max: 18.0 },
                voice_usage: (200.0, 100.0),
            },
            PlanSpec {
                name: "Blizzard",
                price: 75.0,
                category: PlanCategory::Postpaid,
                data_gb: 999,
                weight: 0.22,
                contract_types: &["12M", "24M", "DevicePayment"],
                arpu_range: (65.0, 95.0),
                min_lines: 1,
                max_lines: 1,
                data_usage: DataUsageSpec { mean: 30.0, std: 15.0, max: 100.0 },
                voice_usage: (150.0, 100.0),
            },
            PlanSpec {
                name: "Avalanche",
                price: 140.0,
                category: PlanCategory::Postpaid,
                data_gb: 999,
                weight: 0.12,
                contract_types: &["24M", "DevicePayment"],
                arpu_range: (120.0, 180.0),
                min_lines: 3,
                max_lines: 6,
                data_usage: DataUsageSpec { mean: 45.0, std: 20.0, max: 150.0 },
                voice_usage: (300.0, 150.0),
            },
            PlanSpec {
                name: "Summit",
                price: 95.0,
                category: PlanCategory::Postpaid,
                data_gb: 999,
                weight: 0.09,
                contract_types: &["24M", "DevicePayment"],
                arpu_range: (85.0, 120.0),
                min_lines: 1,
                max_lines: 1,
                data_usage: DataUsageSpec { mean: 40.0, std: 20.0, max: 120.0 },
                voice_usage: (180.0, 100.0),
            },
        ];

        let default_plan_weights: Vec<(&str, f64)> =
            plans.iter().map(|p| (p.name, p.weight)).collect();

        let plan_by_age: DecisionTable<i64> = DecisionTable::new(
            vec![
                DecisionArm {
                    when: |age| *age >= 55,
                    table: table(
                        "plan_55_plus",
                        &[
                            ("Glacier", 0.10),
                            ("Flurry", 0.25),
                            ("Powder", 0.35),
                            ("Blizzard", 0.15),
                            ("Avalanche", 0.08),
                            ("Summit", 0.07),
                        ],
                    ),
                },
                DecisionArm {
                    when: |age| *age <= 28,
                    table: table(
                        "plan_under_29",
                        &[
                            ("Glacier", 0.15),
                            ("Flurry", 0.10),
                            ("Powder", 0.30),
                            ("Blizzard", 0.30),
                            ("Avalanche", 0.05),
                            ("Summit", 0.10),
                        ],
                    ),
                },
            ],
            table("plan_default", &default_plan_weights),
        );

        let device_brands = vec![
            DeviceBrand {
                name: "Apple",
                weight: 0.52,
                os: "iOS",
                models: &[
                    "iPhone 15 Pro Max", "iPhone 15 Pro", "iPhone 15",
                    "iPhone 14", "iPhone 13", "iPhone SE",
                ],
                tiers: table("apple_tiers", &[("Flagship", 0.35), ("Mid", 0.45), ("Budget", 0.20)]),
            },
            DeviceBrand {
                name: "Samsung",
                weight: 0.28,
                os: "Android",
                models: &[
                    "Galaxy S24 Ultra", "Galaxy S24", "Galaxy S23",
                    "Galaxy A54", "Galaxy A34", "Galaxy A14",
                ],
                tiers: table("samsung_tiers", &[("Flagship", 0.25), ("Mid", 0.50), ("Budget", 0.25)]),
            },
            DeviceBrand {
                name: "Google",
                weight: 0.08,
                os: "Android",
                models: &["Pixel 8 Pro", "Pixel 8", "Pixel 7a", "Pixel 7"],
                tiers: table("google_tiers", &[("Flagship", 0.40), ("Mid", 0.50), ("Budget", 0.10)]),
            },
            DeviceBrand {
                name: "Motorola",
                weight: 0.06,
                os: "Android",
                models: &["Edge+ 2024", "Edge 2024", "Moto G Power", "Moto G Stylus"],
                tiers: table("motorola_tiers", &[("Flagship", 0.10), ("Mid", 0.40), ("Budget", 0.50)]),
            },
            DeviceBrand {
                name: "OnePlus",
                weight: 0.03,
                os: "Android",
                models: &["OnePlus 12", "OnePlus 11", "Nord N30"],
                tiers: table("oneplus_tiers", &[("Flagship", 0.50), ("Mid", 0.40), ("Budget", 0.10)]),
            },
            DeviceBrand {
                name: "Other",
                weight: 0.03,
                os: "Android",
                models: &["Basic Smartphone"],
                tiers: table("other_tiers", &[("Flagship", 0.05), ("Mid", 0.25), ("Budget", 0.70)]),
            },
        ];

        let default_brand_weights: Vec<(&str, f64)> =
            device_brands.iter().map(|b| (b.name, b.weight)).collect();

        let device_by_plan: DecisionTable<String> = DecisionTable::new(
            vec![
                DecisionArm {
                    when: |plan: &String| plan == "Summit" || plan == "Blizzard",
                    table: table(
                        "device_premium",
                        &[
                            ("Apple", 0.60),
                            ("Samsung", 0.25),
                            ("Google", 0.08),
                            ("Motorola", 0.04),
                            ("OnePlus", 0.02),
                            ("Other", 0.01),
                        ],
                    ),
                },
                DecisionArm {
                    when: |plan: &String| plan == "Glacier",
                    table: table(
                        "device_prepaid",
                        &[
                            ("Apple", 0.30),
                            ("Samsung", 0.35),
                            ("Google", 0.05),
                            ("Motorola", 0.15),
                            ("OnePlus", 0.02),
                            ("Other", 0.13),
                        ],
                    ),
                },
            ],
            table("device_default", &default_brand_weights),
        );

        let credit_by_plan: DecisionTable<String> = DecisionTable::new(
            vec![
                DecisionArm {
                    when: |plan: &String| plan == "Summit" || plan == "Blizzard",
                    table: table(
                        "credit_premium",
                        &[("A", 0.55), ("B", 0.30), ("C", 0.12), ("D", 0.03)],
                    ),
                },
                DecisionArm {
                    when: |plan: &String| plan == "Glacier",
                    table: table(
                        "credit_prepaid",
                        &[("A", 0.20), ("B", 0.30), ("C", 0.30), ("D", 0.20)],
                    ),
                },
            ],
            table("credit_default", &[("A", 0.40), ("B", 0.30), ("C", 0.20), ("D", 0.10)]),
        );

        let payment_by_plan: DecisionTable<String> = DecisionTable::new(
            vec![DecisionArm {
                when: |plan: &String| plan == "Glacier",
                table: table(
                    "payment_prepaid",
                    &[("AutoPay", 0.30), ("Card", 0.30), ("Manual", 0.25), ("Cash", 0.15)],
                ),
            }],
            table(
                "payment_default",
                &[("AutoPay", 0.55), ("Card", 0.25), ("Manual", 0.15), ("Cash", 0.05)],
            ),
        );

        let churn_reason = table(
            "churn_reason",
            &[
                ("Price", 0.35),
                ("Service Quality", 0.20),
                ("Competitor Offer", 0.25),
                ("Coverage", 0.10),
                ("Support Experience", 0.10),
            ],
        );

        let churn_weights = ChurnRiskWeights {
            base_risk: 0.15,
            tenure_factor: -0.02,
            complaint_factor: 0.05,
            competitor_intensity_factor: 0.05,
            price_sensitivity_factor: 0.003,
            prepaid_plan_factor: 0.10,
            noise_std: 0.05,
            floor: 0.01,
            ceiling: 0.99,
        };

        // Month-indexed seasonal multipliers (Jan..Dec).
        let seasonal_factors =
            [1.0, 0.95, 1.0, 1.0, 1.05, 1.10, 1.15, 1.12, 1.0, 1.0, 1.05, 1.10];

        let usage_trend =
            table("usage_trend", &[("up", 0.3), ("stable", 0.5), ("down", 0.2)]);

        let payment_status_by_credit: DecisionTable<String> = DecisionTable::new(
            vec![
                DecisionArm {
                    when: |credit: &String| credit == "A",
                    table: table("payment_status_a", &[("Paid", 0.99), ("Late", 0.01)]),
                },
                DecisionArm {
                    when: |credit: &String| credit == "D",
                    table: table(
                        "payment_status_d",
                        &[("Paid", 0.60), ("Late", 0.25), ("Partial", 0.10), ("Unpaid", 0.05)],
                    ),
                },
            ],
            table(
                "payment_status_default",
                &[("Paid", 0.85), ("Late", 0.12), ("Partial", 0.03)],
            ),
        );

        let support_channels_by_age: DecisionTable<i64> = DecisionTable::new(
            vec![
                DecisionArm {
                    when: |age| *age < 35,
                    table: table(
                        "channel_young",
                        &[
                            ("App", 0.35),
                            ("Chat", 0.30),
                            ("Call", 0.15),
                            ("Email", 0.10),
                            ("Store", 0.05),
                            ("Social", 0.05),
                        ],
                    ),
                },
                DecisionArm {
                    when: |age| *age > 55,
                    table: table(
                        "channel_senior",
                        &[
                            ("Call", 0.45),
                            ("Store", 0.25),
                            ("Email", 0.15),
                            ("App", 0.08),
                            ("Chat", 0.05),
                            ("Social", 0.02),
                        ],
                    ),
                },
            ],
            table(
                "channel_default",
                &[
                    ("App", 0.25),
                    ("Chat", 0.20),
                    ("Call", 0.30),
                    ("Email", 0.10),
                    ("Store", 0.10),
                    ("Social", 0.05),
                ],
            ),
        );

        let support_categories_by_risk: DecisionTable<f64> = DecisionTable::new(
            vec![DecisionArm {
                when: |risk| *risk > 0.6,
                table: table(
                    "category_at_risk",
                    &[
                        ("Billing", 0.35),
                        ("Complaint", 0.25),
                        ("Technical", 0.20),
                        ("Sales", 0.10),
                        ("General", 0.05),
                        ("Account", 0.05),
                    ],
                ),
            }],
            table(
                "category_default",
                &[
                    ("Billing", 0.30),
                    ("Technical", 0.25),
                    ("Sales", 0.15),
                    ("Complaint", 0.12),
                    ("General", 0.10),
                    ("Account", 0.08),
                ],
            ),
        );

        let resolution_by_category: DecisionTable<String> = DecisionTable::new(
            vec![DecisionArm {
                when: |category: &String| category == "Complaint",
                table: table(
                    "resolution_complaint",
                    &[
                        ("Resolved", 0.45),
                        ("Escalated", 0.30),
                        ("Pending", 0.15),
                        ("Unresolved", 0.10),
                    ],
                ),
            }],
            table(
                "resolution_default",
                &[("Resolved", 0.75), ("Escalated", 0.15), ("Pending", 0.10)],
            ),
        );

        // Negative sentiment must pull CSAT down and vice versa — the
        // coupling is a cross-field correlation the validator checks.
        let csat_by_sentiment: DecisionTable<f64> = DecisionTable::new(
            vec![
                DecisionArm {
                    when: |s| *s < -0.3,
                    table: table("csat_negative", &[("1", 0.4), ("2", 0.4), ("3", 0.2)]),
                },
                DecisionArm {
                    when: |s| *s > 0.3,
                    table: table("csat_positive", &[("3", 0.1), ("4", 0.3), ("5", 0.6)]),
                },
            ],
            table("csat_neutral", &[("2", 0.2), ("3", 0.5), ("4", 0.3)]),
        );

        let campaign_types = vec![
            CampaignTypeSpec { name: "Retention", weight: 0.25, response_rate: 0.15, conversion_rate: 0.08 },
            CampaignTypeSpec { name: "Upsell", weight: 0.30, response_rate: 0.08, conversion_rate: 0.04 },
            CampaignTypeSpec { name: "Cross-sell", weight: 0.15, response_rate: 0.06, conversion_rate: 0.03 },
            CampaignTypeSpec { name: "Win-back", weight: 0.10, response_rate: 0.05, conversion_rate: 0.02 },
            CampaignTypeSpec { name: "Loyalty", weight: 0.12, response_rate: 0.12, conversion_rate: 0.06 },
            CampaignTypeSpec { name: "Seasonal", weight: 0.08, response_rate: 0.10, conversion_rate: 0.05 },
        ];

        let default_campaign_weights: Vec<(&str, f64)> =
            campaign_types.iter().map(|t| (t.name, t.weight)).collect();

        let campaign_type_by_profile: DecisionTable<CampaignProfile> = DecisionTable::new(
            vec![
                DecisionArm {
                    when: |p: &CampaignProfile| p.churn_risk > 0.5,
                    table: table(
                        "campaign_at_risk",
                        &[
                            ("Retention", 0.40),
                            ("Upsell", 0.15),
                            ("Cross-sell", 0.10),
                            ("Win-back", 0.05),
                            ("Loyalty", 0.20),
                            ("Seasonal", 0.10),
                        ],
                    ),
                },
                DecisionArm {
                    when: |p: &CampaignProfile| p.arpu > 80.0,
                    table: table(
                        "campaign_high_value",
                        &[
                            ("Retention", 0.15),
                            ("Upsell", 0.30),
                            ("Cross-sell", 0.20),
                            ("Win-back", 0.02),
                            ("Loyalty", 0.25),
                            ("Seasonal", 0.08),
                        ],
                    ),
                },
            ],
            table("campaign_default", &default_campaign_weights),
        );

        let campaign_channels = table(
            "campaign_channel",
            &[
                ("Email", 0.40),
                ("SMS", 0.30),
                ("App Push", 0.20),
                ("Direct Mail", 0.05),
                ("Call", 0.05),
            ],
        );

        let dma_seeds = vec![
            DmaSeed { code: "501", name: "New York, NY", base_subs: 7_500_000 },
            DmaSeed { code: "803", name: "Los Angeles, CA", base_subs: 5_800_000 },
            DmaSeed { code: "602", name: "Chicago, IL", base_subs: 3_500_000 },
            DmaSeed { code: "504", name: "Philadelphia, PA", base_subs: 2_900_000 },
            DmaSeed { code: "807", name: "San Francisco-Oakland-San Jose, CA", base_subs: 2_700_000 },
            DmaSeed { code: "511", name: "Washington, DC", base_subs: 2_500_000 },
            DmaSeed { code: "506", name: "Boston, MA", base_subs: 2_400_000 },
            DmaSeed { code: "623", name: "Dallas-Ft. Worth, TX", base_subs: 2_800_000 },
            DmaSeed { code: "524", name: "Atlanta, GA", base_subs: 2_600_000 },
            DmaSeed { code: "618", name: "Houston, TX", base_subs: 2_500_000 },
            DmaSeed { code: "505", name: "Detroit, MI", base_subs: 1_900_000 },
            DmaSeed { code: "819", name: "Seattle-Tacoma, WA", base_subs: 2_000_000 },
            DmaSeed { code: "753", name: "Phoenix, AZ", base_subs: 2_100_000 },
            DmaSeed { code: "613", name: "Minneapolis-St. Paul, MN", base_subs: 1_800_000 },
            DmaSeed { code: "510", name: "Cleveland-Akron, OH", base_subs: 1_500_000 },
            DmaSeed { code: "528", name: "Miami-Ft. Lauderdale, FL", base_subs: 1_700_000 },
            DmaSeed { code: "751", name: "Denver, CO", base_subs: 1_600_000 },
            DmaSeed { code: "527", name: "Indianapolis, IN", base_subs: 1_100_000 },
            DmaSeed { code: "539", name: "Tampa-St. Petersburg, FL", base_subs: 1_500_000 },
            DmaSeed { code: "825", name: "San Diego, CA", base_subs: 1_300_000 },
            DmaSeed { code: "609", name: "St. Louis, MO", base_subs: 1_200_000 },
            DmaSeed { code: "560", name: "Raleigh-Durham, NC", base_subs: 1_200_000 },
            DmaSeed { code: "617", name: "Milwaukee, WI", base_subs: 900_000 },
            DmaSeed { code: "515", name: "Cincinnati, OH", base_subs: 900_000 },
            DmaSeed { code: "548", name: "West Palm Beach, FL", base_subs: 800_000 },
            DmaSeed { code: "508", name: "Pittsburgh, PA", base_subs: 1_100_000 },
            DmaSeed { code: "640", name: "Memphis, TN", base_subs: 700_000 },
            DmaSeed { code: "534", name: "Orlando, FL", base_subs: 1_400_000 },
            DmaSeed { code: "641", name: "San Antonio, TX", base_subs: 1_000_000 },
            DmaSeed { code: "512", name: "Baltimore, MD", base_subs: 1_100_000 },
            DmaSeed { code: "659", name: "Nashville, TN", base_subs: 1_000_000 },
            DmaSeed { code: "561", name: "Jacksonville, FL", base_subs: 800_000 },
            DmaSeed { code: "820", name: "Portland, OR", base_subs: 900_000 },
            DmaSeed { code: "517", name: "Charlotte, NC", base_subs: 1_100_000 },
            DmaSeed { code: "544", name: "Norfolk, VA", base_subs: 700_000 },
            DmaSeed { code: "533", name: "Hartford, CT", base_subs: 700_000 },
            DmaSeed { code: "521", name: "Providence, RI", base_subs: 600_000 },
            DmaSeed { code: "563", name: "Grand Rapids, MI", base_subs: 500_000 },
            DmaSeed { code: "686", name: "Mobile, AL", base_subs: 400_000 },
            DmaSeed { code: "546", name: "Columbia, SC", base_subs: 500_000 },
            DmaSeed { code: "525", name: "Columbus, OH", base_subs: 900_000 },
            DmaSeed { code: "532", name: "Albany, NY", base_subs: 500_000 },
            DmaSeed { code: "577", name: "Scranton, PA", base_subs: 400_000 },
            DmaSeed { code: "566", name: "Harrisburg, PA", base_subs: 500_000 },
            DmaSeed { code: "557", name: "Knoxville, TN", base_subs: 500_000 },
            DmaSeed { code: "693", name: "Little Rock, AR", base_subs: 450_000 },
            DmaSeed { code: "541", name: "Lexington, KY", base_subs: 400_000 },
            DmaSeed { code: "630", name: "Birmingham, AL", base_subs: 600_000 },
            DmaSeed { code: "691", name: "Huntsville, AL", base_subs: 400_000 },
            DmaSeed { code: "518", name: "Greensboro, NC", base_subs: 600_000 },
            DmaSeed { code: "545", name: "Greenville, SC", base_subs: 600_000 },
            DmaSeed { code: "542", name: "Dayton, OH", base_subs: 500_000 },
            DmaSeed { code: "564", name: "Charleston, WV", base_subs: 350_000 },
            DmaSeed { code: "540", name: "Louisville, KY", base_subs: 700_000 },
            DmaSeed { code: "881", name: "Spokane, WA", base_subs: 400_000 },
            DmaSeed { code: "813", name: "Medford, OR", base_subs: 200_000 },
            DmaSeed { code: "622", name: "New Orleans, LA", base_subs: 700_000 },
            DmaSeed { code: "650", name: "Oklahoma City, OK", base_subs: 700_000 },
            DmaSeed { code: "770", name: "Salt Lake City, UT", base_subs: 900_000 },
            DmaSeed { code: "679", name: "Des Moines, IA", base_subs: 450_000 },
            DmaSeed { code: "839", name: "Las Vegas, NV", base_subs: 900_000 },
            DmaSeed { code: "718", name: "Jackson, MS", base_subs: 350_000 },
            DmaSeed { code: "678", name: "Wichita, KS", base_subs: 350_000 },
            DmaSeed { code: "790", name: "Albuquerque, NM", base_subs: 500_000 },
            DmaSeed { code: "652", name: "Omaha, NE", base_subs: 500_000 },
            DmaSeed { code: "757", name: "Boise, ID", base_subs: 400_000 },
            DmaSeed { code: "744", name: "Honolulu, HI", base_subs: 600_000 },
            DmaSeed { code: "762", name: "Missoula, MT", base_subs: 150_000 },
            DmaSeed { code: "725", name: "Sioux Falls, SD", base_subs: 250_000 },
            DmaSeed { code: "724", name: "Fargo, ND", base_subs: 200_000 },
            DmaSeed { code: "743", name: "Anchorage, AK", base_subs: 200_000 },
            DmaSeed { code: "523", name: "Burlington, VT", base_subs: 150_000 },
            DmaSeed { code: "767", name: "Casper, WY", base_subs: 100_000 },
            DmaSeed { code: "500", name: "Portland, ME", base_subs: 350_000 },
        ];

        let carrier_share = vec![
            ("Verizon", ParamDist::new(28.0, 5.0)),
            ("AT&T", ParamDist::new(25.0, 5.0)),
            ("T-Mobile", ParamDist::new(24.0, 6.0)),
            ("Snowmobile", ParamDist::new(18.0, 4.0)),
            ("Regional", ParamDist::new(5.0, 3.0)),
        ];

        let carrier_price = vec![
            ("Verizon", ParamDist::new(78.0, 8.0)),
            ("AT&T", ParamDist::new(72.0, 8.0)),
            ("T-Mobile", ParamDist::new(65.0, 7.0)),
            ("Snowmobile", ParamDist::new(68.0, 8.0)),
            ("Regional", ParamDist::new(45.0, 10.0)),
        ];

        let lifestyle_by_geography = vec![
            (
                UrbanClass::Urban,
                table(
                    "lifestyle_urban",
                    &[
                        ("Urban Tech Elite", 0.25),
                        ("Young & Mobile", 0.20),
                        ("Premium Professionals", 0.15),
                        ("Budget Maximizers", 0.15),
                        ("Small Biz Hustlers", 0.10),
                        ("Connected Seniors", 0.08),
                        ("Digital Minimalists", 0.07),
                    ],
                ),
            ),
            (
                UrbanClass::Suburban,
                table(
                    "lifestyle_suburban",
                    &[
                        ("Suburban Family Focus", 0.35),
                        ("Premium Professionals", 0.15),
                        ("Silver Streamers", 0.15),
                        ("Young & Mobile", 0.10),
                        ("Connected Seniors", 0.10),
                        ("Budget Maximizers", 0.08),
                        ("Small Biz Hustlers", 0.07),
                    ],
                ),
            ),
            (
                UrbanClass::Rural,
                table(
                    "lifestyle_rural",
                    &[
                        ("Rural Reliability", 0.35),
                        ("Silver Streamers", 0.20),
                        ("Budget Maximizers", 0.15),
                        ("Connected Seniors", 0.12),
                        ("Digital Minimalists", 0.10),
                        ("Small Biz Hustlers", 0.08),
                    ],
                ),
            ),
            (
                UrbanClass::Remote,
                table(
                    "lifestyle_remote",
                    &[
                        ("Rural Reliability", 0.50),
                        ("Digital Minimalists", 0.20),
                        ("Silver Streamers", 0.15),
                        ("Budget Maximizers", 0.10),
                        ("Connected Seniors", 0.05),
                    ],
                ),
            ),
        ];

        Self {
            total_customers: 1_000_000,
            months_of_usage: 12,
            avg_interactions_per_customer: 2.0,
            avg_campaigns_per_customer: 5.0,
            zones: 42_000,
            dmas: 210,
            snapshot_date: NaiveDate::from_ymd_opt(2025, 6, 1)
                .expect("snapshot date literal is valid"),
            states,
            urban_rural,
            national_median_income: 75_000.0,
            income_clamp: (25_000.0, 300_000.0),
            age_buckets,
            gender,
            acquisition_channels,
            plans,
            plan_by_age,
            device_brands,
            device_by_plan,
            credit_by_plan,
            payment_by_plan,
            churn_reason,
            churn_weights,
            seasonal_factors,
            usage_trend,
            payment_status_by_credit,
            support_channels_by_age,
            support_categories_by_risk,
            resolution_by_category,
            csat_by_sentiment,
            campaign_types,
            campaign_type_by_profile,
            campaign_channels,
            dma_seeds,
            carrier_share,
            carrier_price,
            lifestyle_by_geography,
            cost_of_living: ParamDist::bounded(100.0, 20.0, 70.0, 180.0),
            unemployment: ParamDist::bounded(4.0, 1.5, 1.5, 12.0),
            credit_score: ParamDist::bounded(710.0, 50.0, 580.0, 800.0),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn state_weights_are_population_shares() {
        let cfg = GenConfig::default();
        let total: f64 = cfg.states.iter().map(|s| s.weight).sum();
        assert!((total - 1.0).abs() < 0.01, "state weights sum to {total}");
    }

    #[test]
    fn every_state_dma_is_seeded() {
        // Geography may only hand out DMA codes the competitive
        // generator is guaranteed to emit — this is what makes the
        // customer→market foreign key hold by construction.
        let cfg = GenConfig::default();
        for state in &cfg.states {
            for dma in state.dmas {
                assert!(
                    cfg.dma_seeds.iter().any(|d| d.code == *dma),
                    "state {} references unseeded DMA {dma}",
                    state.code
                );
            }
        }
    }

    #[test]
    fn plan_by_age_selects_expected_arms() {
        let cfg = GenConfig::default();
        assert_eq!(cfg.plan_by_age.select(&60).name(), "plan_55_plus");
        assert_eq!(cfg.plan_by_age.select(&22).name(), "plan_under_29");
        assert_eq!(cfg.plan_by_age.select(&40).name(), "plan_default");
    }

    #[test]
    fn family_plan_carries_the_line_rule() {
        let cfg = GenConfig::default();
        let avalanche = cfg.plan("Avalanche");
        assert_eq!(avalanche.min_lines, 3);
        assert_eq!(avalanche.max_lines, 6);
        assert_eq!(avalanche.category, PlanCategory::Postpaid);
    }

    #[test]
    fn lowest_tier_plan_is_prepaid() {
        let cfg = GenConfig::default();
        assert_eq!(cfg.plan("Glacier").category, PlanCategory::Prepaid);
    }

    #[test]
    fn all_lifestyle_labels_are_known_clusters() {
        let cfg = GenConfig::default();
        for (_, table) in &cfg.lifestyle_by_geography {
            for label in table.labels() {
                assert!(
                    LIFESTYLE_CLUSTERS.contains(&label),
                    "unknown cluster {label}"
                );
            }
        }
    }
}
