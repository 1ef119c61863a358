//! Template Layout Operations
//!
//! Parsing template text into a [`TemplateLayout`], deriving its cell sets,
//! and writing the canonical text form back out.
//!
//! Template text is line oriented. Lines containing `=` are `key=value`
//! configuration; every other non-blank line is a grid row. Grid rows must be
//! contiguous. The canonical form is the grid, a blank line, then the keys in
//! a fixed order.

use super::error::TemplateError;
use super::layout_data::{DerivedCells, MaterialSpec, TemplateConfig, TemplateLayout};
use super::vector::RelativeVector;
use crate::constants::symbols::{self, CONTROL, ENTRANCE, EXIT, IGNORE};
use crate::constants::template_keys::*;
use crate::world::core::{BlockId, MaterialRegistry};
use std::collections::BTreeMap;
use std::fmt::Write;
use std::sync::OnceLock;

static ANY_MATERIAL: MaterialSpec = MaterialSpec::Any;

/// Parser switches
#[derive(Debug, Clone, Copy, Default)]
pub struct ParseOptions {
    /// Accept grid symbols that have no mapping and learn them at match time
    pub lenient_symbols: bool,
}

/// Parse template text
pub fn parse_template(
    name: &str,
    text: &str,
    registry: &MaterialRegistry,
    options: ParseOptions,
) -> Result<TemplateLayout, TemplateError> {
    let mut rows: Vec<Vec<char>> = Vec::new();
    let mut entries: Vec<(String, String)> = Vec::new();
    let mut grid_closed = false;

    for (index, raw) in text.lines().enumerate() {
        let line = raw.trim_end_matches('\r');
        if line.trim().is_empty() {
            grid_closed |= !rows.is_empty();
            continue;
        }
        if rows.is_empty() && entries.is_empty() && line.starts_with(symbols::TAG_PREFIX) {
            // header comment
            continue;
        }
        if let Some((key, value)) = line.split_once('=') {
            grid_closed |= !rows.is_empty();
            entries.push((key.trim().to_string(), value.trim().to_string()));
            continue;
        }
        if grid_closed {
            return Err(TemplateError::TornLayout { line: index + 1 });
        }
        rows.push(line.chars().collect());
    }

    if rows.is_empty() {
        return Err(TemplateError::EmptyLayout);
    }

    let columns = rows.iter().map(Vec::len).max().unwrap_or(0);
    for row in &mut rows {
        row.resize(columns, IGNORE);
    }

    let mut config = TemplateConfig {
        portal_open: resolve_material(PORTAL_OPEN, DEFAULT_PORTAL_OPEN, registry)?,
        portal_closed: resolve_material(PORTAL_CLOSED, DEFAULT_PORTAL_CLOSED, registry)?,
        button: resolve_material(BUTTON, DEFAULT_BUTTON, registry)?,
        use_cost: None,
        create_cost: None,
        destroy_cost: None,
        to_owner: None,
    };
    let mut materials = BTreeMap::new();
    for (key, value) in &entries {
        match key.as_str() {
            PORTAL_OPEN => config.portal_open = resolve_material(key, value, registry)?,
            PORTAL_CLOSED => config.portal_closed = resolve_material(key, value, registry)?,
            BUTTON => config.button = resolve_material(key, value, registry)?,
            USE_COST => config.use_cost = Some(parse_number(key, value)?),
            CREATE_COST => config.create_cost = Some(parse_number(key, value)?),
            DESTROY_COST => config.destroy_cost = Some(parse_number(key, value)?),
            TO_OWNER => config.to_owner = Some(parse_flag(key, value)?),
            _ => match single_symbol(key) {
                Some(symbol) if !matches!(symbol, IGNORE | ENTRANCE | EXIT) => {
                    materials.insert(symbol, resolve_spec(key, value, registry)?);
                }
                _ => log::debug!("[parse_template] {}: ignoring unknown key '{}'", name, key),
            },
        }
    }

    if !registry.is_interactive(config.button) {
        return Err(TemplateError::InvalidButton {
            material: registry
                .name_of(config.button)
                .unwrap_or("unknown")
                .to_string(),
        });
    }

    for (row_index, row) in rows.iter().enumerate() {
        for (column, &symbol) in row.iter().enumerate() {
            if materials.contains_key(&symbol) || matches!(symbol, IGNORE | ENTRANCE | EXIT) {
                continue;
            }
            if symbol == CONTROL || options.lenient_symbols {
                materials.insert(symbol, MaterialSpec::Unmapped);
            } else {
                return Err(TemplateError::UnmappedSymbol {
                    symbol,
                    row: row_index,
                    column,
                });
            }
        }
    }

    let layout = TemplateLayout {
        name: name.to_string(),
        grid: rows,
        materials,
        config,
        derived: OnceLock::new(),
    };
    validate_layout(&layout)?;

    log::debug!(
        "[parse_template] {}: {}x{} grid, {} border, {} entrance cells",
        name,
        layout.columns(),
        layout.rows(),
        layout.border().len(),
        layout.entrances().len()
    );
    Ok(layout)
}

/// Structural checks every registered template must pass
pub fn validate_layout(layout: &TemplateLayout) -> Result<(), TemplateError> {
    let found = layout.controls().len();
    if found != CONTROL_CELLS {
        return Err(TemplateError::ControlCount { found });
    }
    if layout.entrances().is_empty() {
        return Err(TemplateError::NoEntrances);
    }
    Ok(())
}

/// Derive the cell sets of a grid
/// Pure function - one top-down scan; the last opening seen in a column is its lowest
pub fn derive_cells(grid: &[Vec<char>]) -> DerivedCells {
    let mut cells = DerivedCells::default();
    let columns = grid.first().map_or(0, Vec::len);
    let mut lowest: Vec<Option<RelativeVector>> = vec![None; columns];
    let mut marked_exit = None;

    for (row_index, row) in grid.iter().enumerate() {
        for (column, &symbol) in row.iter().enumerate() {
            let cell = RelativeVector::cell(column, row_index);
            match symbol {
                IGNORE => {}
                ENTRANCE | EXIT => {
                    cells.entrances.push(cell);
                    lowest[column] = Some(cell);
                    if symbol == EXIT && marked_exit.is_none() {
                        marked_exit = Some(cell);
                    }
                }
                CONTROL => {
                    cells.controls.push(cell);
                    cells.border.push(cell);
                }
                _ => cells.border.push(cell),
            }
        }
    }

    cells.exits = lowest.into_iter().flatten().collect();
    cells.exit = marked_exit.or_else(|| cells.exits.get(cells.exits.len() / 2).copied());
    cells
}

/// Write the canonical text of a template
pub fn write_template(layout: &TemplateLayout, registry: &MaterialRegistry) -> String {
    let mut out = String::new();
    for row in &layout.grid {
        let line: String = row.iter().collect();
        out.push_str(line.trim_end_matches(IGNORE));
        out.push('\n');
    }
    out.push('\n');

    let config = &layout.config;
    let name = |id: BlockId| material_name(id, registry);
    let _ = writeln!(out, "{}={}", PORTAL_OPEN, name(config.portal_open));
    let _ = writeln!(out, "{}={}", PORTAL_CLOSED, name(config.portal_closed));
    let _ = writeln!(out, "{}={}", BUTTON, name(config.button));
    for (key, cost) in [
        (USE_COST, config.use_cost),
        (CREATE_COST, config.create_cost),
        (DESTROY_COST, config.destroy_cost),
    ] {
        if let Some(cost) = cost {
            let _ = writeln!(out, "{}={}", key, cost);
        }
    }
    if let Some(to_owner) = config.to_owner {
        let _ = writeln!(out, "{}={}", TO_OWNER, to_owner);
    }

    for (symbol, spec) in &layout.materials {
        match spec {
            MaterialSpec::Materials(ids) => {
                let separator = symbols::MATERIAL_SEPARATOR.to_string();
                let names: Vec<String> = ids.iter().map(|id| name(*id)).collect();
                let _ = writeln!(out, "{}={}", symbol, names.join(separator.as_str()));
            }
            MaterialSpec::Tag { name, .. } => {
                let _ = writeln!(out, "{}={}{}", symbol, symbols::TAG_PREFIX, name);
            }
            MaterialSpec::Any | MaterialSpec::Unmapped => {}
        }
    }
    out
}

impl TemplateLayout {
    pub fn rows(&self) -> usize {
        self.grid.len()
    }

    pub fn columns(&self) -> usize {
        self.grid.first().map_or(0, Vec::len)
    }

    /// Symbol at a face cell; `None` off the grid or off the face plane
    pub fn symbol_at(&self, cell: RelativeVector) -> Option<char> {
        if cell.out != 0 || cell.right < 0 || cell.down < 0 {
            return None;
        }
        self.grid
            .get(cell.down as usize)
            .and_then(|row| row.get(cell.right as usize))
            .copied()
    }

    /// Material spec of a symbol; the ignore symbol matches anything
    pub fn material_for(&self, symbol: char) -> Option<&MaterialSpec> {
        if symbol == IGNORE {
            return Some(&ANY_MATERIAL);
        }
        self.materials.get(&symbol)
    }

    /// Derived cell sets, computed on first use
    pub fn cells(&self) -> &DerivedCells {
        self.derived.get_or_init(|| derive_cells(&self.grid))
    }

    pub fn border(&self) -> &[RelativeVector] {
        &self.cells().border
    }

    pub fn entrances(&self) -> &[RelativeVector] {
        &self.cells().entrances
    }

    pub fn exits(&self) -> &[RelativeVector] {
        &self.cells().exits
    }

    pub fn controls(&self) -> &[RelativeVector] {
        &self.cells().controls
    }

    /// Landing reference cell
    pub fn exit(&self) -> Option<RelativeVector> {
        self.cells().exit
    }

    pub fn to_template_text(&self, registry: &MaterialRegistry) -> String {
        write_template(self, registry)
    }
}

fn single_symbol(key: &str) -> Option<char> {
    let mut chars = key.chars();
    match (chars.next(), chars.next()) {
        (Some(symbol), None) => Some(symbol),
        _ => None,
    }
}

fn resolve_material(
    key: &str,
    value: &str,
    registry: &MaterialRegistry,
) -> Result<BlockId, TemplateError> {
    registry
        .get_id(value)
        .ok_or_else(|| TemplateError::UnknownMaterial {
            key: key.to_string(),
            name: value.to_string(),
        })
}

fn resolve_spec(
    key: &str,
    value: &str,
    registry: &MaterialRegistry,
) -> Result<MaterialSpec, TemplateError> {
    if let Some(tag) = value.strip_prefix(symbols::TAG_PREFIX) {
        let members = registry.tag(tag).ok_or_else(|| TemplateError::UnknownTag {
            key: key.to_string(),
            name: tag.to_string(),
        })?;
        return Ok(MaterialSpec::Tag {
            name: MaterialRegistry::normalize_name(tag),
            members: members.clone(),
        });
    }

    let mut ids = Vec::new();
    for part in value.split(symbols::MATERIAL_SEPARATOR) {
        let part = part.trim();
        if part.is_empty() {
            continue;
        }
        let id = resolve_material(key, part, registry)?;
        if !ids.contains(&id) {
            ids.push(id);
        }
    }
    if ids.is_empty() {
        return Err(TemplateError::InvalidValue {
            key: key.to_string(),
            value: value.to_string(),
        });
    }
    Ok(MaterialSpec::Materials(ids))
}

fn parse_number(key: &str, value: &str) -> Result<i32, TemplateError> {
    value.parse().map_err(|_| TemplateError::InvalidValue {
        key: key.to_string(),
        value: value.to_string(),
    })
}

fn parse_flag(key: &str, value: &str) -> Result<bool, TemplateError> {
    match value.to_ascii_lowercase().as_str() {
        "true" => Ok(true),
        "false" => Ok(false),
        _ => Err(TemplateError::InvalidValue {
            key: key.to_string(),
            value: value.to_string(),
        }),
    }
}

fn material_name(id: BlockId, registry: &MaterialRegistry) -> String {
    registry
        .name_of(id)
        .map(str::to_string)
        .unwrap_or_else(|| id.0.to_string())
}

#[cfg(test)]
mod tests {
    use super::*;

    const NETHER_GATE: &str = "\
 XX
X..X
-..-
X*.X
 XX

portal-open=NETHER_PORTAL
portal-closed=AIR
button=STONE_BUTTON
usecost=5
toowner=false
X=OBSIDIAN
-=OBSIDIAN
";

    fn parse(text: &str) -> Result<TemplateLayout, TemplateError> {
        parse_template("test.gate", text, &MaterialRegistry::new(), ParseOptions::default())
    }

    fn layout_with_controls(controls: usize) -> String {
        let mut row: String = "X".repeat(4);
        for i in 0..controls.min(4) {
            row.replace_range(i..i + 1, "-");
        }
        let mut text = String::new();
        if controls > 4 {
            text.push_str(&"-".repeat(controls - 4));
            text.push('\n');
        }
        text.push_str(&row);
        text.push_str("\nX..X\nXXXX\n\nX=OBSIDIAN\n");
        text
    }

    #[test]
    fn test_parse_nether_gate() {
        let layout = parse(NETHER_GATE).expect("valid template");
        assert_eq!(layout.rows(), 5);
        assert_eq!(layout.columns(), 4);
        assert_eq!(layout.controls().len(), 2);
        assert_eq!(layout.entrances().len(), 6);
        assert_eq!(layout.border().len(), 10);
        assert_eq!(layout.exit(), Some(RelativeVector::cell(1, 3)));
        assert_eq!(
            layout.exits(),
            &[RelativeVector::cell(1, 3), RelativeVector::cell(2, 3)]
        );
        assert_eq!(layout.config.use_cost, Some(5));
        assert_eq!(layout.config.create_cost, None);
        assert_eq!(layout.config.to_owner, Some(false));
    }

    #[test]
    fn test_missing_keys_use_default_portal_materials() {
        let layout = parse("X-X\nX.X\nX-X\n\nX=OBSIDIAN\n").expect("valid template");
        assert_eq!(layout.config.portal_open, BlockId::NETHER_PORTAL);
        assert_eq!(layout.config.portal_closed, BlockId::AIR);
        assert_eq!(layout.config.button, BlockId::STONE_BUTTON);
    }

    #[test]
    fn test_rows_are_padded_with_ignore() {
        let layout = parse(NETHER_GATE).expect("valid template");
        assert_eq!(layout.symbol_at(RelativeVector::cell(3, 0)), Some(IGNORE));
        assert_eq!(layout.material_for(IGNORE), Some(&MaterialSpec::Any));
        assert_eq!(layout.symbol_at(RelativeVector::new(0, 0, 1)), None);
    }

    #[test]
    fn test_config_before_grid_is_accepted() {
        let text = "X=OBSIDIAN\nbutton=OAK_BUTTON\n\nX-X\nX.X\nX-X\n";
        let layout = parse(text).expect("valid template");
        assert_eq!(layout.config.button, BlockId::OAK_BUTTON);
        assert_eq!(layout.controls().len(), 2);
    }

    #[test]
    fn test_control_count_must_be_two() {
        for controls in 0..=5 {
            let result = parse(&layout_with_controls(controls));
            if controls == 2 {
                assert!(result.is_ok(), "two controls should parse");
            } else {
                assert_eq!(result, Err(TemplateError::ControlCount { found: controls }));
            }
        }
    }

    #[test]
    fn test_no_entrances_rejected() {
        let text = "X-X\nXXX\nX-X\n\nX=OBSIDIAN\n";
        assert_eq!(parse(text), Err(TemplateError::NoEntrances));
    }

    #[test]
    fn test_button_must_be_interactive() {
        let text = "X-X\nX.X\nX-X\n\nX=OBSIDIAN\nbutton=OBSIDIAN\n";
        assert_eq!(
            parse(text),
            Err(TemplateError::InvalidButton {
                material: "OBSIDIAN".to_string()
            })
        );
    }

    #[test]
    fn test_unmapped_symbol_rejected_unless_lenient() {
        let text = "X-X\nY.Y\nX-X\n\nX=OBSIDIAN\n";
        assert_eq!(
            parse(text),
            Err(TemplateError::UnmappedSymbol {
                symbol: 'Y',
                row: 1,
                column: 0
            })
        );

        let lenient = parse_template(
            "lenient.gate",
            text,
            &MaterialRegistry::new(),
            ParseOptions {
                lenient_symbols: true,
            },
        )
        .expect("lenient parse");
        assert_eq!(lenient.material_for('Y'), Some(&MaterialSpec::Unmapped));
    }

    #[test]
    fn test_torn_layout_rejected() {
        let text = "X-X\nX.X\n\nX-X\n\nX=OBSIDIAN\n";
        assert_eq!(parse(text), Err(TemplateError::TornLayout { line: 4 }));
    }

    #[test]
    fn test_material_lists_and_tags() {
        let text = "XWX\n-.-\nXWX\n\nX=OBSIDIAN, CRYING_OBSIDIAN\nW=#wool\n";
        let layout = parse(text).expect("valid template");
        assert_eq!(
            layout.material_for('X'),
            Some(&MaterialSpec::Materials(vec![
                BlockId::OBSIDIAN,
                BlockId::CRYING_OBSIDIAN
            ]))
        );
        let wool = layout.material_for('W').expect("W mapped");
        assert!(wool.accepts(BlockId::BLUE_WOOL));
        assert!(!wool.accepts(BlockId::OBSIDIAN));
        // '-' has no mapping of its own
        assert_eq!(layout.material_for(CONTROL), Some(&MaterialSpec::Unmapped));
    }

    #[test]
    fn test_unknown_materials_rejected() {
        let text = "X-X\nX.X\nX-X\n\nX=UNOBTAINIUM\n";
        assert!(matches!(
            parse(text),
            Err(TemplateError::UnknownMaterial { .. })
        ));
        let text = "X-X\nX.X\nX-X\n\nX=#NOT_A_TAG\n";
        assert!(matches!(parse(text), Err(TemplateError::UnknownTag { .. })));
        let text = "X-X\nX.X\nX-X\n\nX=OBSIDIAN\nusecost=lots\n";
        assert!(matches!(parse(text), Err(TemplateError::InvalidValue { .. })));
    }

    #[test]
    fn test_unknown_keys_ignored() {
        let text = "X-X\nX.X\nX-X\n\nX=OBSIDIAN\ncolour=PURPLE\n";
        assert!(parse(text).is_ok());
    }

    #[test]
    fn test_header_comments_skipped() {
        let text = "# small gate\nX-X\nX.X\nX-X\n\nX=OBSIDIAN\n";
        let layout = parse(text).expect("valid template");
        assert_eq!(layout.rows(), 3);
    }

    #[test]
    fn test_exit_falls_back_to_middle_of_exits() {
        let text = "X-X-X\nX...X\nX...X\nXXXXX\n\nX=OBSIDIAN\n-=OBSIDIAN\n";
        let layout = parse(text).expect("valid template");
        assert_eq!(layout.exits().len(), 3);
        assert_eq!(layout.exit(), Some(RelativeVector::cell(2, 2)));
    }

    #[test]
    fn test_canonical_round_trip() {
        let registry = MaterialRegistry::new();
        let text = "W=#wool\nX=OBSIDIAN,CRYING_OBSIDIAN\ndestroycost=3\n\n XWX\nX...X\n-.*.-\nXWWWX\n";
        let first = parse(text).expect("valid template");
        let canonical = first.to_template_text(&registry);
        assert!(canonical.starts_with(" XWX\n"));

        let second = parse(&canonical).expect("canonical text parses");
        assert_eq!(first, second);
        assert_eq!(first.cells(), second.cells());
        assert_eq!(second.to_template_text(&registry), canonical);
    }
}
