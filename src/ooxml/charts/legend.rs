//! Chart legend.

use crate::ooxml::charts::chart::ChartLayout;
use crate::ooxml::charts::format::{ChartFont, ChartFormat};
use crate::ooxml::charts::types::ChartLegendPosition;

/// Chart legend configuration.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct ChartLegend {
    /// Legend position
    pub(crate) position: ChartLegendPosition,
    pub(crate) hidden: bool,
    /// Overlay on the plot area
    pub(crate) overlay: bool,
    pub(crate) font: Option<ChartFont>,
    pub(crate) format: ChartFormat,
    /// Manual layout
    pub(crate) layout: Option<ChartLayout>,
    /// Series indices whose entries are removed
    pub(crate) deleted_entries: Vec<usize>,
}

impl ChartLegend {
    pub fn new() -> Self {
        Self::default()
    }

    #[inline]
    pub fn set_position(&mut self, position: ChartLegendPosition) -> &mut Self {
        self.position = position;
        self
    }

    #[inline]
    pub fn set_hidden(&mut self) -> &mut Self {
        self.hidden = true;
        self
    }

    #[inline]
    pub fn set_overlay(&mut self) -> &mut Self {
        self.overlay = true;
        self
    }

    pub fn set_font(&mut self, font: &ChartFont) -> &mut Self {
        self.font = Some(font.clone());
        self
    }

    pub fn set_format(&mut self, format: &ChartFormat) -> &mut Self {
        self.format = format.clone();
        self
    }

    pub fn set_layout(&mut self, layout: &ChartLayout) -> &mut Self {
        self.layout = Some(*layout);
        self
    }

    /// Remove the legend entries of the given series.
    pub fn delete_entries(&mut self, entries: &[usize]) -> &mut Self {
        let mut entries = entries.to_vec();
        entries.sort_unstable();
        entries.dedup();
        self.deleted_entries = entries;
        self
    }
}
