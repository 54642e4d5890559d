//! Tree-map series: hierarchical value derivation and rectangular
//! partitioning.
//!
//! Parent values derive from the sum of their children before layout; tiles
//! are partitioned slice-and-dice, alternating split direction per depth.
//! Both traversals run over explicit worklists.

use crate::data_item::DataItem;
use crate::percent::ZERO_FLOOR;
use crate::series::SeriesCore;
use crate::value::{DataValue, Record};
use graficar_core::Rect;

/// Input node of the hierarchy.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct TreeMapNode {
    /// Node category / label
    pub category: String,
    /// Own value; ignored when the node has children
    pub value: Option<f64>,
    /// Child nodes
    pub children: Vec<TreeMapNode>,
}

impl TreeMapNode {
    /// Create a leaf node.
    #[must_use]
    pub fn leaf(category: impl Into<String>, value: f64) -> Self {
        Self {
            category: category.into(),
            value: Some(value),
            children: Vec::new(),
        }
    }

    /// Create a branch node; its value derives from the children.
    #[must_use]
    pub fn branch(category: impl Into<String>, children: Vec<Self>) -> Self {
        Self {
            category: category.into(),
            value: None,
            children,
        }
    }
}

/// Flattened node, index-aligned with the series' data items.
#[derive(Debug, Clone, PartialEq)]
struct FlatNode {
    own_value: Option<f64>,
    derived: f64,
    children: Vec<usize>,
    depth: usize,
}

/// Hierarchical tile series.
#[derive(Debug, Clone, PartialEq)]
pub struct TreeMapSeries {
    /// Base aggregation engine over the flattened hierarchy
    pub core: SeriesCore,
    nodes: Vec<FlatNode>,
    roots: Vec<usize>,
}

impl TreeMapSeries {
    /// Create a tree-map series.
    #[must_use]
    pub fn new(name: impl Into<String>) -> Self {
        let mut core = SeriesCore::new(name);
        core.map_field("value", "value");
        core.map_field("category", "category");
        core.set_calculate_percent(true);
        Self {
            core,
            nodes: Vec::new(),
            roots: Vec::new(),
        }
    }

    /// Assign the hierarchy. Nodes flatten pre-order into data items.
    pub fn set_nodes(&mut self, roots: Vec<TreeMapNode>) {
        self.nodes.clear();
        self.roots.clear();
        let mut records: Vec<Record> = Vec::new();

        // Iterative pre-order flatten; children enqueue after their parent.
        let mut stack: Vec<(TreeMapNode, usize, Option<usize>)> = roots
            .into_iter()
            .rev()
            .map(|node| (node, 0, None))
            .collect();
        while let Some((node, depth, parent)) = stack.pop() {
            let index = self.nodes.len();
            let mut record = Record::new();
            record.insert("category".into(), DataValue::Text(node.category));
            if let Some(value) = node.value {
                record.insert("value".into(), DataValue::Number(value));
            }
            records.push(record);
            self.nodes.push(FlatNode {
                own_value: node.value,
                derived: 0.0,
                children: Vec::new(),
                depth,
            });
            match parent {
                Some(p) => self.nodes[p].children.push(index),
                None => self.roots.push(index),
            }
            for child in node.children.into_iter().rev() {
                stack.push((child, depth + 1, Some(index)));
            }
        }

        self.core.set_data(records);
    }

    /// Derived value of a node (post roll-up).
    #[must_use]
    pub fn node_value(&self, index: usize) -> Option<f64> {
        self.nodes.get(index).map(|n| n.derived)
    }

    /// Depth of a node.
    #[must_use]
    pub fn node_depth(&self, index: usize) -> Option<usize> {
        self.nodes.get(index).map(|n| n.depth)
    }

    /// Run a full validation pass into the given bounds.
    pub fn validate(&mut self, bounds: Rect) {
        self.core.validate_data();
        self.roll_up();
        self.core.validate_data_items();
        self.core.process_values(true);
        self.layout(bounds);
    }

    /// Derive every parent's value as the sum of its children. The flat
    /// arena is pre-order, so a reverse sweep sees children before parents.
    fn roll_up(&mut self) {
        for i in (0..self.nodes.len()).rev() {
            let node = &self.nodes[i];
            let derived = if node.children.is_empty() {
                node.own_value.unwrap_or(0.0)
            } else {
                node.children.iter().map(|&c| self.nodes[c].derived).sum()
            };
            self.nodes[i].derived = derived;
            if let Some(item) = self.core.items_mut().get_mut(i) {
                item.set_value("value", derived);
            }
        }
    }

    /// Slice-and-dice partition: each sibling group splits its rectangle
    /// proportionally to derived values, alternating the split direction
    /// with depth.
    fn layout(&mut self, bounds: Rect) {
        let mut worklist: Vec<(Vec<usize>, Rect, usize)> =
            vec![(self.roots.clone(), bounds, 0)];

        while let Some((siblings, rect, depth)) = worklist.pop() {
            let total: f64 = siblings
                .iter()
                .map(|&i| self.nodes[i].derived.abs().max(ZERO_FLOOR))
                .sum::<f64>()
                .max(ZERO_FLOOR);
            let horizontal = depth % 2 == 0;
            let mut cursor = if horizontal { rect.x } else { rect.y };

            for &i in &siblings {
                let share = self.nodes[i].derived.abs().max(ZERO_FLOOR) / total;
                let tile = if horizontal {
                    let width = share * rect.width;
                    let tile = Rect::new(cursor, rect.y, width, rect.height);
                    cursor += width;
                    tile
                } else {
                    let height = share * rect.height;
                    let tile = Rect::new(rect.x, cursor, rect.width, height);
                    cursor += height;
                    tile
                };

                if let Some(item) = self.core.items_mut().get_mut(i) {
                    let column = item.visuals.column.get_or_insert_with(Default::default);
                    column.x = tile.x;
                    column.y = tile.y;
                    column.width = tile.width;
                    column.height = tile.height;
                    column.disabled = false;
                }
                if !self.nodes[i].children.is_empty() {
                    worklist.push((self.nodes[i].children.clone(), tile, depth + 1));
                }
            }
        }
    }

    /// Tile of a node, if laid out.
    #[must_use]
    pub fn tile(&self, index: usize) -> Option<Rect> {
        let column = self
            .core
            .items()
            .get(index)?
            .visuals
            .column
            .as_ref()
            .filter(|c| !c.disabled)?;
        Some(Rect::new(column.x, column.y, column.width, column.height))
    }

    /// Item of a node.
    #[must_use]
    pub fn item(&self, index: usize) -> Option<&DataItem> {
        self.core.items().get(index)
    }
}
