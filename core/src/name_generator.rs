//! Deterministic company name generation using curated word lists.
//!
//! Client names only need to look like real companies; uniqueness is
//! not required. All generation is deterministic (same RNG seed = same names).

use crate::rng::SubsystemRng;

/// Deterministic company-name generator using curated lists
pub struct NameGenerator;

impl NameGenerator {
    /// Generate a company name in one of four shapes:
    ///   "Surname Suffix", "Surname-Surname", "Surname, Surname and Surname",
    ///   "Prefix Industry Suffix".
    pub fn generate_company_name(rng: &mut SubsystemRng) -> String {
        match rng.next_u64_below(4) {
            0 => format!(
                "{} {}",
                Self::generate_surname(rng),
                rng.pick(Self::suffixes())
            ),
            1 => format!(
                "{}-{}",
                Self::generate_surname(rng),
                Self::generate_surname(rng)
            ),
            2 => format!(
                "{}, {} and {}",
                Self::generate_surname(rng),
                Self::generate_surname(rng),
                Self::generate_surname(rng)
            ),
            _ => format!(
                "{} {} {}",
                rng.pick(Self::prefixes()),
                rng.pick(Self::industries()),
                rng.pick(Self::suffixes())
            ),
        }
    }

    pub fn generate_surname(rng: &mut SubsystemRng) -> &'static str {
        *rng.pick(Self::surnames())
    }

    fn surnames() -> &'static [&'static str] {
        &[
            "Abbott", "Alvarez", "Barnes", "Becker", "Bishop", "Bowman", "Brennan",
            "Castillo", "Chandler", "Chen", "Collier", "Conway", "Dalton", "Delgado",
            "Donovan", "Ellison", "Esposito", "Farrell", "Fischer", "Fleming", "Garner",
            "Gibbs", "Greer", "Hale", "Harmon", "Hayden", "Holloway", "Ibarra", "Jensen",
            "Kaufman", "Keller", "Kramer", "Lambert", "Lindqvist", "Lowe", "Maddox",
            "Marsh", "McBride", "Mendez", "Morrow", "Nakamura", "Novak", "Okafor",
            "Olsen", "Patel", "Pruitt", "Quinn", "Ramsey", "Reyes", "Rhodes", "Salas",
            "Schultz", "Sharpe", "Stanton", "Sutton", "Tanaka", "Thornton", "Underwood",
            "Vance", "Vogel", "Walsh", "Whitaker", "Wolfe", "Yates", "Zimmerman",
        ]
    }

    fn prefixes() -> &'static [&'static str] {
        &[
            "Apex", "Beacon", "Blue Ridge", "Cardinal", "Cascade", "Evergreen",
            "Frontier", "Granite", "Harbor", "Keystone", "Lakeside", "Meridian",
            "Northstar", "Pinnacle", "Prairie", "Redwood", "Summit", "Tri-County",
        ]
    }

    fn suffixes() -> &'static [&'static str] {
        &[
            "Inc", "LLC", "Ltd", "Group", "PLC", "and Sons", "Co", "Partners",
            "Holdings", "Enterprises",
        ]
    }

    fn industries() -> &'static [&'static str] {
        &[
            "Supply", "Outfitters", "Home Goods", "Electronics", "Apparel", "Foods",
            "Hardware", "Office Products", "Pet Supply", "Sporting Goods", "Garden",
            "Wholesale", "Trading", "Distribution", "Furnishings",
        ]
    }
}
