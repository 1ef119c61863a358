//! Engine-wide constants
//!
//! Grouped by the subsystem that owns them.

/// Reserved template symbols. These exist in every template whether or not
/// the key-value section mentions them.
pub mod symbols {
    /// Matches anything, not part of the structure
    pub const IGNORE: char = ' ';
    /// Portal opening
    pub const ENTRANCE: char = '.';
    /// Portal opening that is also the landing reference
    pub const EXIT: char = '*';
    /// Where the sign and button sit
    pub const CONTROL: char = '-';

    /// Prefix marking a tag reference in a material value (`X=#WOOL`)
    pub const TAG_PREFIX: char = '#';
    /// Separator for multi-material values (`X=OBSIDIAN,CRYING_OBSIDIAN`)
    pub const MATERIAL_SEPARATOR: char = ',';
}

/// Template configuration keys and their defaults.
pub mod template_keys {
    pub const PORTAL_OPEN: &str = "portal-open";
    pub const PORTAL_CLOSED: &str = "portal-closed";
    pub const BUTTON: &str = "button";
    pub const USE_COST: &str = "usecost";
    pub const CREATE_COST: &str = "createcost";
    pub const DESTROY_COST: &str = "destroycost";
    pub const TO_OWNER: &str = "toowner";

    pub const DEFAULT_PORTAL_OPEN: &str = "NETHER_PORTAL";
    pub const DEFAULT_PORTAL_CLOSED: &str = "AIR";
    pub const DEFAULT_BUTTON: &str = "STONE_BUTTON";

    /// Number of control cells every template must have
    pub const CONTROL_CELLS: usize = 2;

    /// File extension for template files
    pub const TEMPLATE_EXTENSION: &str = "gate";
}

/// Exit resolution limits.
pub mod exit_search {
    /// Layers the cone keeps pushing straight out from the structure
    pub const OUTWARD_LAYERS: usize = 7;
    /// Layers after which sideways and vertical growth stops
    pub const SPREAD_LAYERS: usize = 4;
    /// Extra outward displacement for occupants carrying a rider
    pub const MOUNTED_EXTRA_OFFSET: f64 = 1.0;
    /// Lift applied when landing on a bottom slab or in water
    pub const VERTICAL_CORRECTION: f64 = 1.0;
}
