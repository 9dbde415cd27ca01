//! Grid composition

use std::collections::HashSet;

use log::{debug, trace};

use crate::config::TileSize;
use crate::legend::{FragmentTemplate, LookupTable, PRESERVE_ASPECT_RATIO};
use crate::markup::{Element, Node, SVG_NAMESPACE, XLINK_NAMESPACE};
use crate::renderer::PlacementMode;
use crate::warning::Warning;

use super::grid::Grid;

/// The composed output document
#[derive(Debug, Clone)]
pub struct Composition {
    /// Root `<svg>` element of the output
    pub document: Element,
    /// Unmapped-symbol warnings, one per skipped cell
    pub warnings: Vec<Warning>,
    /// Number of tiles placed
    pub placements: usize,
}

/// Places legend fragments on a uniform tile grid
#[derive(Debug, Clone)]
pub struct Compositor {
    tile: TileSize,
    placement: PlacementMode,
}

impl Compositor {
    pub fn new(tile: TileSize) -> Self {
        Self {
            tile,
            placement: PlacementMode::default(),
        }
    }

    /// Set how placements refer to their fragment
    pub fn with_placement(mut self, placement: PlacementMode) -> Self {
        self.placement = placement;
        self
    }

    /// Compose `grid` using the fragments in `table`
    ///
    /// Cell `(r, c)` is placed at `(c * tile width, r * tile height)`. Space
    /// cells are skipped; cells with unknown symbols are skipped with a warning.
    pub fn compose(&self, table: &LookupTable, grid: &Grid) -> Composition {
        let mut warnings = Vec::new();
        let mut placed = Vec::new();
        let mut used: Vec<&FragmentTemplate> = Vec::new();
        let mut seen = HashSet::new();

        for cell in grid.cells() {
            if cell.is_blank() {
                continue;
            }

            let Some(template) = table.get(cell.symbol) else {
                warnings.push(Warning::UnmappedSymbol {
                    symbol: cell.symbol,
                    row: cell.row,
                    column: cell.column,
                });
                continue;
            };

            let x = cell.column as f64 * self.tile.width;
            let y = cell.row as f64 * self.tile.height;
            trace!("placing {:?} at ({}, {})", cell.symbol, x, y);

            let element = match self.placement {
                PlacementMode::Inline => self.place_inline(template, x, y),
                PlacementMode::Symbol => {
                    if seen.insert(cell.symbol) {
                        used.push(template);
                    }
                    self.place_use(template, x, y)
                }
            };
            placed.push(Node::from(element));
        }

        let width = grid.max_row_length() as f64 * self.tile.width;
        let height = grid.row_count() as f64 * self.tile.height;
        debug!(
            "composed {} tiles on a {}x{} canvas",
            placed.len(),
            width,
            height
        );

        let mut root = Element::new("svg").with_attribute("xmlns", SVG_NAMESPACE);
        for (prefix, uri) in table.namespaces() {
            root.set_attribute(format!("xmlns:{}", prefix), uri);
        }
        if self.placement == PlacementMode::Symbol {
            root.set_attribute("xmlns:xlink", XLINK_NAMESPACE);
        }
        root.set_attribute("viewBox", format!("0 0 {} {}", width, height));
        root.set_attribute("preserveAspectRatio", PRESERVE_ASPECT_RATIO);

        for template in used {
            root.append(template.to_symbol_element());
        }
        let placements = placed.len();
        root.extend(placed);

        Composition {
            document: root,
            warnings,
            placements,
        }
    }

    /// A nested `<svg>` holding a fresh copy of the fragment
    fn place_inline(&self, template: &FragmentTemplate, x: f64, y: f64) -> Element {
        let mut element = self.tile_box(Element::new("svg"), x, y);
        if let Some(view_box) = template.sizing().view_box() {
            element.set_attribute("viewBox", view_box);
        }
        element.set_attribute("preserveAspectRatio", PRESERVE_ASPECT_RATIO);
        element.extend(template.instantiate());
        element
    }

    /// A `<use>` pointing at the fragment's `<symbol>`
    fn place_use(&self, template: &FragmentTemplate, x: f64, y: f64) -> Element {
        let element =
            Element::new("use").with_attribute("xlink:href", format!("#{}", template.id()));
        self.tile_box(element, x, y)
    }

    fn tile_box(&self, element: Element, x: f64, y: f64) -> Element {
        element
            .with_attribute("x", x)
            .with_attribute("y", y)
            .with_attribute("width", self.tile.width)
            .with_attribute("height", self.tile.height)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::legend::LegendLoader;
    use std::path::Path;

    fn table(legend: &str) -> LookupTable {
        LegendLoader::new()
            .load_str(legend, Path::new("."))
            .expect("Should load")
            .table
    }

    fn placed_elements(doc: &Element) -> Vec<&Element> {
        doc.children()
            .iter()
            .filter_map(|c| match c {
                Node::Element(e) if e.name() != "symbol" => Some(e),
                _ => None,
            })
            .collect()
    }

    #[test]
    fn test_single_cell_round_trip() {
        let composition = Compositor::new(TileSize::default())
            .compose(&table("A <circle r='10'/>"), &Grid::parse("A"));

        let doc = &composition.document;
        assert_eq!(doc.attribute("xmlns"), Some(SVG_NAMESPACE));
        assert_eq!(doc.attribute("viewBox"), Some("0 0 50 50"));
        assert_eq!(doc.attribute("preserveAspectRatio"), Some("xMinYMin meet"));

        let placed = placed_elements(doc);
        assert_eq!(placed.len(), 1);
        let tile = placed[0];
        assert_eq!(tile.attribute("x"), Some("0"));
        assert_eq!(tile.attribute("y"), Some("0"));
        assert_eq!(tile.attribute("width"), Some("50"));
        assert_eq!(tile.attribute("height"), Some("50"));
        assert_eq!(tile.attribute("preserveAspectRatio"), Some("xMinYMin meet"));
        assert!(matches!(&tile.children()[0], Node::Element(c) if c.name() == "circle"));
        assert_eq!(composition.placements, 1);
        assert!(composition.warnings.is_empty());
    }

    #[test]
    fn test_unmapped_symbol_warns_and_skips() {
        let composition = Compositor::new(TileSize::default())
            .compose(&table("A <rect/>"), &Grid::parse("AX"));

        assert_eq!(composition.placements, 1);
        assert_eq!(
            composition.warnings,
            vec![Warning::UnmappedSymbol {
                symbol: 'X',
                row: 0,
                column: 1
            }]
        );
        assert_eq!(composition.warnings[0].to_string(), "no mapping for symbol: X");
    }

    #[test]
    fn test_one_warning_per_unmapped_cell() {
        let composition = Compositor::new(TileSize::default())
            .compose(&table("A <rect/>"), &Grid::parse("XX\nAX"));
        assert_eq!(composition.warnings.len(), 3);
        assert_eq!(composition.placements, 1);
    }

    #[test]
    fn test_spaces_are_blank() {
        let composition = Compositor::new(TileSize::default())
            .compose(&table("A <rect/>"), &Grid::parse("A A"));
        assert_eq!(composition.placements, 2);
        assert!(composition.warnings.is_empty());
        assert_eq!(composition.document.attribute("viewBox"), Some("0 0 150 50"));
    }

    #[test]
    fn test_ragged_rows_positions() {
        let tile = TileSize::new(10.0, 20.0);
        let composition =
            Compositor::new(tile).compose(&table("A <rect/>"), &Grid::parse("A\n\nAAA\nA"));

        let positions: Vec<(&str, &str)> = placed_elements(&composition.document)
            .iter()
            .map(|e| (e.attribute("x").unwrap(), e.attribute("y").unwrap()))
            .collect();
        assert_eq!(
            positions,
            vec![("0", "0"), ("0", "40"), ("10", "40"), ("20", "40"), ("0", "60")]
        );
        assert_eq!(composition.document.attribute("viewBox"), Some("0 0 30 80"));
    }

    #[test]
    fn test_blank_rows_count_toward_height() {
        let composition = Compositor::new(TileSize::default())
            .compose(&table("A <rect/>"), &Grid::parse("AB\n\n"));
        assert_eq!(composition.document.attribute("viewBox"), Some("0 0 100 100"));
    }

    #[test]
    fn test_fragment_viewbox_is_preserved() {
        let legend = "A <svg xmlns=\"http://www.w3.org/2000/svg\" viewBox=\"0 0 7 9\"><rect/></svg>";
        let composition =
            Compositor::new(TileSize::default()).compose(&table(legend), &Grid::parse("A"));
        let placed = placed_elements(&composition.document);
        assert_eq!(placed[0].attribute("viewBox"), Some("0 0 7 9"));
    }

    #[test]
    fn test_repeated_symbol_gets_independent_copies() {
        let composition = Compositor::new(TileSize::default())
            .compose(&table("A <circle r='1'/>"), &Grid::parse("AA"));
        let placed = placed_elements(&composition.document);
        assert_eq!(placed.len(), 2);
        assert_eq!(placed[0].children(), placed[1].children());
        assert_ne!(placed[0].attribute("x"), placed[1].attribute("x"));
    }

    #[test]
    fn test_symbol_mode_emits_each_used_symbol_once() {
        let legend = "A <rect/>\nB <circle/>\nC <path/>";
        let composition = Compositor::new(TileSize::default())
            .with_placement(PlacementMode::Symbol)
            .compose(&table(legend), &Grid::parse("ABA\nBA"));

        let doc = &composition.document;
        assert_eq!(doc.attribute("xmlns:xlink"), Some(XLINK_NAMESPACE));

        let symbols: Vec<&str> = doc
            .children()
            .iter()
            .filter_map(|c| match c {
                Node::Element(e) if e.name() == "symbol" => e.attribute("id"),
                _ => None,
            })
            .collect();
        assert_eq!(symbols, vec!["svgtilersymbol0", "svgtilersymbol1"]);

        let uses = placed_elements(doc);
        assert_eq!(uses.len(), 5);
        assert_eq!(uses[0].name(), "use");
        assert_eq!(uses[0].attribute("xlink:href"), Some("#svgtilersymbol0"));
        assert_eq!(uses[1].attribute("xlink:href"), Some("#svgtilersymbol1"));
        assert_eq!(uses[4].attribute("x"), Some("50"));
        assert_eq!(uses[4].attribute("y"), Some("50"));
    }

    #[test]
    fn test_fragment_namespaces_declared_on_root() {
        let composition = Compositor::new(TileSize::default())
            .compose(&table("A <use xlink:href='#x'/>"), &Grid::parse("A"));
        assert_eq!(
            composition.document.attribute("xmlns:xlink"),
            Some(XLINK_NAMESPACE)
        );
    }

    #[test]
    fn test_empty_grid() {
        let composition =
            Compositor::new(TileSize::default()).compose(&table("A <rect/>"), &Grid::parse(""));
        assert_eq!(composition.placements, 0);
        assert_eq!(composition.document.attribute("viewBox"), Some("0 0 0 0"));
    }
}
