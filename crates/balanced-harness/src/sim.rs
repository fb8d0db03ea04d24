#![forbid(unsafe_code)]

//! Deterministic in-memory layout engine.
//!
//! [`SimElement`] is a cheap, clonable handle to one block element holding
//! flowed text inside a parent of known inline size. Every extent query
//! reflows synchronously from the current style, so the balancer sees exactly
//! what a browser would report through `clientHeight` / `offsetWidth`.
//!
//! Glyphs advance `advance` layout units per cell (see [`crate::text_flow`]).
//! Lines stack `line_height` units apart along the block axis.
//!
//! # Example
//! ```
//! use balanced_harness::sim::SimElement;
//! use balanced_core::{LayoutTarget, PhysicalAxis};
//!
//! let el = SimElement::builder("one two three four five six")
//!     .container(80.0)
//!     .advance(8.0)
//!     .line_height(20.0)
//!     .build();
//! assert_eq!(el.line_count(), 3);
//! assert_eq!(el.client_extent(PhysicalAxis::Vertical).unwrap(), 60.0);
//! ```

use std::cell::RefCell;
use std::rc::Rc;

use balanced_core::{
    AxisEdges, BoxSizing, ComputedStyle, HostError, LayoutTarget, LineHeight, NodeId,
    PhysicalAxis, ResizeEntry, WritingMode,
};
use rustc_hash::FxHashMap;

use crate::text_flow;

/// Which host capabilities the simulated element exposes.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SimCapabilities {
    pub style_readback: bool,
    pub style_mutation: bool,
}

impl Default for SimCapabilities {
    fn default() -> Self {
        Self {
            style_readback: true,
            style_mutation: true,
        }
    }
}

/// Counters for what the balancer did to an element.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct SimStats {
    /// Extent queries answered (each one is a synchronous reflow).
    pub reflows: usize,
    /// Every `max-inline-size` write, `None` for clears.
    pub constraint_writes: Vec<Option<f64>>,
    /// Physical axes extents were read along, in order.
    pub measured_axes: Vec<PhysicalAxis>,
}

#[derive(Debug)]
struct SimNode {
    id: NodeId,
    parent: Option<NodeId>,
    attached: bool,
    text: String,
    writing_mode: WritingMode,
    advance: f64,
    line_height: LineHeight,
    padding_block: AxisEdges,
    padding_inline: AxisEdges,
    border: f64,
    container: f64,
    max_inline: Option<f64>,
    box_sizing: BoxSizing,
    caps: SimCapabilities,
    stats: SimStats,
    line_cache: FxHashMap<usize, usize>,
}

impl SimNode {
    fn font_size(&self) -> f64 {
        self.advance * 2.0
    }

    fn line_pitch(&self) -> f64 {
        self.line_height
            .resolved()
            .unwrap_or_else(|| self.font_size() * 1.2)
    }

    /// Border-box inline size after applying `max-inline-size`.
    fn border_box_inline(&self) -> f64 {
        let chrome = self.padding_inline.sum() + 2.0 * self.border;
        let size = match (self.max_inline, self.box_sizing) {
            (None, _) => self.container,
            (Some(max), BoxSizing::BorderBox) => self.container.min(max),
            (Some(max), BoxSizing::ContentBox) => self.container.min(max + chrome),
        };
        size.max(chrome)
    }

    fn content_inline(&self) -> f64 {
        (self.border_box_inline() - self.padding_inline.sum() - 2.0 * self.border).max(0.0)
    }

    fn cells(&self) -> usize {
        if self.advance <= 0.0 {
            return usize::MAX;
        }
        (self.content_inline() / self.advance).floor() as usize
    }

    fn lines(&mut self) -> usize {
        let cells = self.cells();
        if let Some(&lines) = self.line_cache.get(&cells) {
            return lines;
        }
        let lines = text_flow::line_count(&self.text, cells);
        self.line_cache.insert(cells, lines);
        lines
    }

    fn extents(&mut self, axis: PhysicalAxis, with_border: bool) -> Result<f64, HostError> {
        if !self.attached {
            return Err(HostError::Detached);
        }
        if !self.caps.style_readback {
            return Err(HostError::CapabilityUnavailable("layout readback"));
        }
        self.stats.reflows += 1;
        self.stats.measured_axes.push(axis);

        let border = if with_border { 2.0 * self.border } else { 0.0 };
        let axes = self.writing_mode.axes();
        if axis == axes.inline {
            Ok(self.border_box_inline() - 2.0 * self.border + border)
        } else {
            let lines = self.lines() as f64;
            Ok(lines * self.line_pitch() + self.padding_block.sum() + border)
        }
    }

    fn check_mutable(&self) -> Result<(), HostError> {
        if !self.attached {
            return Err(HostError::Detached);
        }
        if !self.caps.style_mutation {
            return Err(HostError::CapabilityUnavailable("style mutation"));
        }
        Ok(())
    }
}

/// Handle to a simulated block element.
///
/// Clones share the same node, like DOM element references.
#[derive(Debug, Clone)]
pub struct SimElement {
    node: Rc<RefCell<SimNode>>,
}

impl SimElement {
    /// Start building an element holding `text`.
    #[must_use]
    pub fn builder(text: impl Into<String>) -> SimElementBuilder {
        SimElementBuilder::new(text)
    }

    /// Whether two handles point at the same node.
    #[must_use]
    pub fn ptr_eq(&self, other: &Self) -> bool {
        Rc::ptr_eq(&self.node, &other.node)
    }

    /// This element's node id.
    #[must_use]
    pub fn id(&self) -> NodeId {
        self.node.borrow().id
    }

    /// Lines the text currently occupies.
    #[must_use]
    pub fn line_count(&self) -> usize {
        self.node.borrow_mut().lines()
    }

    /// The rendered lines at the current style.
    #[must_use]
    pub fn lines(&self) -> Vec<String> {
        let node = self.node.borrow();
        text_flow::wrap_lines(&node.text, node.cells())
    }

    /// Resize the parent's inline size, returning the notification a
    /// resize observer on the parent would deliver.
    ///
    /// Returns `None` for elements without a parent.
    pub fn resize_container(&self, inline_size: f64) -> Option<ResizeEntry> {
        let mut node = self.node.borrow_mut();
        node.container = inline_size;
        node.parent.map(|parent| ResizeEntry::new(parent, inline_size))
    }

    /// Current parent inline size.
    #[must_use]
    pub fn container(&self) -> f64 {
        self.node.borrow().container
    }

    /// Replace the text content.
    pub fn set_text(&self, text: impl Into<String>) {
        let mut node = self.node.borrow_mut();
        node.text = text.into();
        node.line_cache.clear();
    }

    /// Switch writing mode.
    pub fn set_writing_mode(&self, writing_mode: WritingMode) {
        self.node.borrow_mut().writing_mode = writing_mode;
    }

    /// Remove the element from the tree.
    pub fn detach(&self) {
        self.node.borrow_mut().attached = false;
    }

    /// Change which capabilities are exposed.
    pub fn set_capabilities(&self, caps: SimCapabilities) {
        self.node.borrow_mut().caps = caps;
    }

    /// Applied box sizing.
    #[must_use]
    pub fn box_sizing(&self) -> BoxSizing {
        self.node.borrow().box_sizing
    }

    /// Snapshot of the counters.
    #[must_use]
    pub fn stats(&self) -> SimStats {
        self.node.borrow().stats.clone()
    }

    /// Reset the counters.
    pub fn reset_stats(&self) {
        self.node.borrow_mut().stats = SimStats::default();
    }
}

impl LayoutTarget for SimElement {
    fn computed_style(&self) -> Result<ComputedStyle, HostError> {
        let node = self.node.borrow();
        if !node.attached {
            return Err(HostError::Detached);
        }
        if !node.caps.style_readback {
            return Err(HostError::CapabilityUnavailable("computed style"));
        }
        Ok(ComputedStyle {
            writing_mode: node.writing_mode,
            padding_block: node.padding_block,
            padding_inline: node.padding_inline,
            line_height: node.line_height,
        })
    }

    fn client_extent(&self, axis: PhysicalAxis) -> Result<f64, HostError> {
        self.node.borrow_mut().extents(axis, false)
    }

    fn offset_extent(&self, axis: PhysicalAxis) -> Result<f64, HostError> {
        self.node.borrow_mut().extents(axis, true)
    }

    fn set_max_inline_size(&mut self, size: Option<f64>) -> Result<(), HostError> {
        let mut node = self.node.borrow_mut();
        node.check_mutable()?;
        node.max_inline = size;
        node.stats.constraint_writes.push(size);
        Ok(())
    }

    fn max_inline_size(&self) -> Option<f64> {
        self.node.borrow().max_inline
    }

    fn set_box_sizing(&mut self, sizing: BoxSizing) -> Result<(), HostError> {
        let mut node = self.node.borrow_mut();
        node.check_mutable()?;
        node.box_sizing = sizing;
        Ok(())
    }

    fn layout_parent(&self) -> Option<NodeId> {
        let node = self.node.borrow();
        if node.attached { node.parent } else { None }
    }
}

/// Builder for [`SimElement`].
#[derive(Debug, Clone)]
pub struct SimElementBuilder {
    id: NodeId,
    parent: Option<NodeId>,
    text: String,
    writing_mode: WritingMode,
    advance: f64,
    line_height: LineHeight,
    padding_block: AxisEdges,
    padding_inline: AxisEdges,
    border: f64,
    container: f64,
    box_sizing: BoxSizing,
}

impl SimElementBuilder {
    /// Defaults: horizontal, 8px cells, 20px lines, no padding, 320px parent.
    #[must_use]
    pub fn new(text: impl Into<String>) -> Self {
        Self {
            id: NodeId::new(2),
            parent: Some(NodeId::new(1)),
            text: text.into(),
            writing_mode: WritingMode::HorizontalTb,
            advance: 8.0,
            line_height: LineHeight::Length(20.0),
            padding_block: AxisEdges::default(),
            padding_inline: AxisEdges::default(),
            border: 0.0,
            container: 320.0,
            box_sizing: BoxSizing::ContentBox,
        }
    }

    #[must_use]
    pub fn id(mut self, id: NodeId) -> Self {
        self.id = id;
        self
    }

    /// Set the parent node, or `None` for a detached root.
    #[must_use]
    pub fn parent(mut self, parent: Option<NodeId>) -> Self {
        self.parent = parent;
        self
    }

    #[must_use]
    pub fn writing_mode(mut self, writing_mode: WritingMode) -> Self {
        self.writing_mode = writing_mode;
        self
    }

    /// Layout units per cell.
    #[must_use]
    pub fn advance(mut self, advance: f64) -> Self {
        self.advance = advance;
        self
    }

    #[must_use]
    pub fn line_height(mut self, line_height: f64) -> Self {
        self.line_height = LineHeight::Length(line_height);
        self
    }

    /// Use `line-height: normal`.
    #[must_use]
    pub fn normal_line_height(mut self) -> Self {
        self.line_height = LineHeight::Normal;
        self
    }

    /// Same padding on all four sides.
    #[must_use]
    pub fn padding(mut self, padding: f64) -> Self {
        self.padding_block = AxisEdges::all(padding);
        self.padding_inline = AxisEdges::all(padding);
        self
    }

    #[must_use]
    pub fn padding_block(mut self, edges: AxisEdges) -> Self {
        self.padding_block = edges;
        self
    }

    #[must_use]
    pub fn padding_inline(mut self, edges: AxisEdges) -> Self {
        self.padding_inline = edges;
        self
    }

    /// Border width on every side.
    #[must_use]
    pub fn border(mut self, border: f64) -> Self {
        self.border = border;
        self
    }

    /// Parent inline size.
    #[must_use]
    pub fn container(mut self, container: f64) -> Self {
        self.container = container;
        self
    }

    #[must_use]
    pub fn box_sizing(mut self, box_sizing: BoxSizing) -> Self {
        self.box_sizing = box_sizing;
        self
    }

    #[must_use]
    pub fn build(self) -> SimElement {
        SimElement {
            node: Rc::new(RefCell::new(SimNode {
                id: self.id,
                parent: self.parent,
                attached: true,
                text: self.text,
                writing_mode: self.writing_mode,
                advance: self.advance,
                line_height: self.line_height,
                padding_block: self.padding_block,
                padding_inline: self.padding_inline,
                border: self.border,
                container: self.container,
                max_inline: None,
                box_sizing: self.box_sizing,
                caps: SimCapabilities::default(),
                stats: SimStats::default(),
                line_cache: FxHashMap::default(),
            })),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sample() -> SimElement {
        SimElement::builder("one two three four five six")
            .container(80.0)
            .advance(8.0)
            .line_height(20.0)
            .build()
    }

    #[test]
    fn reflows_on_constraint() {
        let mut el = sample();
        assert_eq!(el.line_count(), 3);
        el.set_max_inline_size(Some(40.0)).unwrap();
        assert_eq!(el.line_count(), 6);
        assert_eq!(el.offset_extent(PhysicalAxis::Horizontal).unwrap(), 40.0);
    }

    #[test]
    fn content_box_constraint_adds_padding() {
        let mut el = SimElement::builder("abc")
            .container(200.0)
            .padding(10.0)
            .build();
        el.set_max_inline_size(Some(50.0)).unwrap();
        assert_eq!(el.offset_extent(PhysicalAxis::Horizontal).unwrap(), 70.0);
        el.set_box_sizing(BoxSizing::BorderBox).unwrap();
        assert_eq!(el.offset_extent(PhysicalAxis::Horizontal).unwrap(), 50.0);
    }

    #[test]
    fn border_counts_in_offset_not_client() {
        let el = SimElement::builder("abc").container(100.0).border(2.0).build();
        assert_eq!(el.offset_extent(PhysicalAxis::Horizontal).unwrap(), 100.0);
        assert_eq!(el.client_extent(PhysicalAxis::Horizontal).unwrap(), 96.0);
    }

    #[test]
    fn vertical_mode_swaps_physical_axes() {
        let el = SimElement::builder("one two three four five six")
            .container(80.0)
            .writing_mode(WritingMode::VerticalRl)
            .build();
        assert_eq!(el.offset_extent(PhysicalAxis::Vertical).unwrap(), 80.0);
        assert_eq!(el.client_extent(PhysicalAxis::Horizontal).unwrap(), 60.0);
    }

    #[test]
    fn detached_element_is_unmeasurable() {
        let el = sample();
        el.detach();
        assert_eq!(el.computed_style(), Err(HostError::Detached));
        assert_eq!(el.layout_parent(), None);
    }

    #[test]
    fn clones_share_state() {
        let mut a = sample();
        let b = a.clone();
        a.set_max_inline_size(Some(40.0)).unwrap();
        assert_eq!(b.max_inline_size(), Some(40.0));
        assert!(a.ptr_eq(&b));
    }

    #[test]
    fn resize_reports_parent() {
        let el = sample();
        let entry = el.resize_container(120.0).unwrap();
        assert_eq!(entry.node, NodeId::new(1));
        assert_eq!(entry.inline_size, 120.0);
        assert_eq!(el.line_count(), 2);
    }
}
