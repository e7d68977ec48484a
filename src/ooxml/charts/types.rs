//! Chart type and option enumerations.

/// Chart type.
///
/// Bar charts have horizontal bars, column charts vertical ones.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ChartType {
    Area,
    AreaStacked,
    AreaPercentStacked,
    Bar,
    BarStacked,
    BarPercentStacked,
    Column,
    ColumnStacked,
    ColumnPercentStacked,
    Doughnut,
    Line,
    LineStacked,
    LinePercentStacked,
    Pie,
    Radar,
    RadarWithMarkers,
    RadarFilled,
    Scatter,
    ScatterStraightWithMarkers,
    ScatterStraight,
    ScatterSmoothWithMarkers,
    ScatterSmooth,
    Stock,
}

impl ChartType {
    /// Plot element name inside `c:plotArea`.
    #[inline]
    pub(crate) fn xml_element_name(&self) -> &'static str {
        match self {
            Self::Area | Self::AreaStacked | Self::AreaPercentStacked => "c:areaChart",
            Self::Bar
            | Self::BarStacked
            | Self::BarPercentStacked
            | Self::Column
            | Self::ColumnStacked
            | Self::ColumnPercentStacked => "c:barChart",
            Self::Doughnut => "c:doughnutChart",
            Self::Line | Self::LineStacked | Self::LinePercentStacked => "c:lineChart",
            Self::Pie => "c:pieChart",
            Self::Radar | Self::RadarWithMarkers | Self::RadarFilled => "c:radarChart",
            Self::Scatter
            | Self::ScatterStraightWithMarkers
            | Self::ScatterStraight
            | Self::ScatterSmoothWithMarkers
            | Self::ScatterSmooth => "c:scatterChart",
            Self::Stock => "c:stockChart",
        }
    }

    /// Value of `c:grouping`, for the types that have one.
    pub(crate) fn grouping(&self) -> Option<&'static str> {
        match self {
            Self::Area | Self::Line => Some("standard"),
            Self::Bar | Self::Column => Some("clustered"),
            Self::AreaStacked | Self::BarStacked | Self::ColumnStacked | Self::LineStacked => {
                Some("stacked")
            },
            Self::AreaPercentStacked
            | Self::BarPercentStacked
            | Self::ColumnPercentStacked
            | Self::LinePercentStacked => Some("percentStacked"),
            _ => None,
        }
    }

    /// Value of `c:barDir`.
    pub(crate) fn bar_direction(&self) -> Option<&'static str> {
        match self {
            Self::Bar | Self::BarStacked | Self::BarPercentStacked => Some("bar"),
            Self::Column | Self::ColumnStacked | Self::ColumnPercentStacked => Some("col"),
            _ => None,
        }
    }

    #[inline]
    pub(crate) const fn is_pie_like(&self) -> bool {
        matches!(self, Self::Pie | Self::Doughnut)
    }

    #[inline]
    pub(crate) const fn is_scatter(&self) -> bool {
        matches!(
            self,
            Self::Scatter
                | Self::ScatterStraightWithMarkers
                | Self::ScatterStraight
                | Self::ScatterSmoothWithMarkers
                | Self::ScatterSmooth
        )
    }

    #[inline]
    pub(crate) const fn is_bar(&self) -> bool {
        matches!(self, Self::Bar | Self::BarStacked | Self::BarPercentStacked)
    }

    #[inline]
    pub(crate) const fn is_stacked(&self) -> bool {
        matches!(
            self,
            Self::AreaStacked
                | Self::AreaPercentStacked
                | Self::BarStacked
                | Self::BarPercentStacked
                | Self::ColumnStacked
                | Self::ColumnPercentStacked
                | Self::LineStacked
                | Self::LinePercentStacked
        )
    }

    #[inline]
    pub(crate) const fn is_percent_stacked(&self) -> bool {
        matches!(
            self,
            Self::AreaPercentStacked
                | Self::BarPercentStacked
                | Self::ColumnPercentStacked
                | Self::LinePercentStacked
        )
    }

    /// Series in these types show no markers unless asked to.
    pub(crate) const fn hides_markers(&self) -> bool {
        matches!(self, Self::Radar | Self::ScatterStraight | Self::ScatterSmooth | Self::Stock)
    }

    /// Series in these types show no connecting line unless asked to.
    pub(crate) const fn hides_lines(&self) -> bool {
        matches!(self, Self::Scatter | Self::Stock)
    }

    pub(crate) const fn is_smooth(&self) -> bool {
        matches!(self, Self::ScatterSmooth | Self::ScatterSmoothWithMarkers)
    }

    pub(crate) fn radar_style(&self) -> &'static str {
        match self {
            Self::RadarFilled => "filled",
            _ => "marker",
        }
    }

    pub(crate) fn scatter_style(&self) -> &'static str {
        if self.is_smooth() {
            "smoothMarker"
        } else {
            "lineMarker"
        }
    }
}

/// Legend position.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum ChartLegendPosition {
    #[default]
    Right,
    Left,
    Top,
    Bottom,
    TopRight,
}

impl ChartLegendPosition {
    #[inline]
    pub(crate) fn xml_value(&self) -> &'static str {
        match self {
            Self::Right => "r",
            Self::Left => "l",
            Self::Top => "t",
            Self::Bottom => "b",
            Self::TopRight => "tr",
        }
    }
}

/// Marker symbol.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum ChartMarkerType {
    #[default]
    Automatic,
    None,
    Square,
    Diamond,
    Triangle,
    X,
    Star,
    Dot,
    Dash,
    Circle,
    PlusSign,
}

impl ChartMarkerType {
    #[inline]
    pub(crate) fn xml_value(&self) -> &'static str {
        match self {
            Self::Automatic => "auto",
            Self::None => "none",
            Self::Square => "square",
            Self::Diamond => "diamond",
            Self::Triangle => "triangle",
            Self::X => "x",
            Self::Star => "star",
            Self::Dot => "dot",
            Self::Dash => "dash",
            Self::Circle => "circle",
            Self::PlusSign => "plus",
        }
    }
}

/// Data label position relative to its point.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ChartDataLabelPosition {
    Center,
    Right,
    Left,
    Above,
    Below,
    InsideBase,
    InsideEnd,
    OutsideEnd,
    BestFit,
}

impl ChartDataLabelPosition {
    #[inline]
    pub(crate) fn xml_value(&self) -> &'static str {
        match self {
            Self::Center => "ctr",
            Self::Right => "r",
            Self::Left => "l",
            Self::Above => "t",
            Self::Below => "b",
            Self::InsideBase => "inBase",
            Self::InsideEnd => "inEnd",
            Self::OutsideEnd => "outEnd",
            Self::BestFit => "bestFit",
        }
    }
}

/// How empty cells in a data range are plotted.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum ChartEmptyCells {
    #[default]
    Gaps,
    Zero,
    Connected,
}

impl ChartEmptyCells {
    #[inline]
    pub(crate) fn xml_value(&self) -> &'static str {
        match self {
            Self::Gaps => "gap",
            Self::Zero => "zero",
            Self::Connected => "span",
        }
    }
}

/// Gradient shape.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum ChartGradientFillType {
    #[default]
    Linear,
    Radial,
    Rectangular,
    Path,
}

impl ChartGradientFillType {
    /// `a:path/@path` for the non-linear types.
    pub(crate) fn path(&self) -> Option<&'static str> {
        match self {
            Self::Linear => None,
            Self::Radial => Some("circle"),
            Self::Rectangular => Some("rect"),
            Self::Path => Some("shape"),
        }
    }
}

/// Line dash styles.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum ChartLineDashType {
    #[default]
    Solid,
    RoundDot,
    SquareDot,
    Dash,
    DashDot,
    LongDash,
    LongDashDot,
    LongDashDotDot,
}

impl ChartLineDashType {
    #[inline]
    pub(crate) fn xml_value(&self) -> &'static str {
        match self {
            Self::Solid => "solid",
            Self::RoundDot => "sysDot",
            Self::SquareDot => "sysDash",
            Self::Dash => "dash",
            Self::DashDot => "dashDot",
            Self::LongDash => "lgDash",
            Self::LongDashDot => "lgDashDot",
            Self::LongDashDotDot => "lgDashDotDot",
        }
    }
}

/// Preset fill patterns.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum ChartPatternFillType {
    #[default]
    Percent5,
    Percent10,
    Percent20,
    Percent25,
    Percent30,
    Percent40,
    Percent50,
    Percent60,
    Percent70,
    Percent75,
    Percent80,
    Percent90,
    LightHorizontal,
    LightVertical,
    DarkHorizontal,
    DarkVertical,
    NarrowHorizontal,
    NarrowVertical,
    DashedHorizontal,
    DashedVertical,
    Horizontal,
    Vertical,
    Cross,
    DownwardDiagonal,
    UpwardDiagonal,
    LightDownwardDiagonal,
    LightUpwardDiagonal,
    DarkDownwardDiagonal,
    DarkUpwardDiagonal,
    WideDownwardDiagonal,
    WideUpwardDiagonal,
    DiagonalCross,
    SmallCheck,
    LargeCheck,
    SmallGrid,
    LargeGrid,
    DottedGrid,
    SmallConfetti,
    LargeConfetti,
    HorizontalBrick,
    DiagonalBrick,
    SolidDiamond,
    OutlinedDiamond,
    DottedDiamond,
    Plaid,
    Sphere,
    Weave,
    Divot,
    Shingle,
    Wave,
    Trellis,
    ZigZag,
}

impl ChartPatternFillType {
    /// Value of `a:pattFill/@prst`.
    pub(crate) fn xml_value(&self) -> &'static str {
        match self {
            Self::Percent5 => "pct5",
            Self::Percent10 => "pct10",
            Self::Percent20 => "pct20",
            Self::Percent25 => "pct25",
            Self::Percent30 => "pct30",
            Self::Percent40 => "pct40",
            Self::Percent50 => "pct50",
            Self::Percent60 => "pct60",
            Self::Percent70 => "pct70",
            Self::Percent75 => "pct75",
            Self::Percent80 => "pct80",
            Self::Percent90 => "pct90",
            Self::LightHorizontal => "ltHorz",
            Self::LightVertical => "ltVert",
            Self::DarkHorizontal => "dkHorz",
            Self::DarkVertical => "dkVert",
            Self::NarrowHorizontal => "narHorz",
            Self::NarrowVertical => "narVert",
            Self::DashedHorizontal => "dashHorz",
            Self::DashedVertical => "dashVert",
            Self::Horizontal => "horz",
            Self::Vertical => "vert",
            Self::Cross => "cross",
            Self::DownwardDiagonal => "dnDiag",
            Self::UpwardDiagonal => "upDiag",
            Self::LightDownwardDiagonal => "ltDnDiag",
            Self::LightUpwardDiagonal => "ltUpDiag",
            Self::DarkDownwardDiagonal => "dkDnDiag",
            Self::DarkUpwardDiagonal => "dkUpDiag",
            Self::WideDownwardDiagonal => "wdDnDiag",
            Self::WideUpwardDiagonal => "wdUpDiag",
            Self::DiagonalCross => "diagCross",
            Self::SmallCheck => "smCheck",
            Self::LargeCheck => "lgCheck",
            Self::SmallGrid => "smGrid",
            Self::LargeGrid => "lgGrid",
            Self::DottedGrid => "dotGrid",
            Self::SmallConfetti => "smConfetti",
            Self::LargeConfetti => "lgConfetti",
            Self::HorizontalBrick => "horzBrick",
            Self::DiagonalBrick => "diagBrick",
            Self::SolidDiamond => "solidDmnd",
            Self::OutlinedDiamond => "openDmnd",
            Self::DottedDiamond => "dotDmnd",
            Self::Plaid => "plaid",
            Self::Sphere => "sphere",
            Self::Weave => "weave",
            Self::Divot => "divot",
            Self::Shingle => "shingle",
            Self::Wave => "wave",
            Self::Trellis => "trellis",
            Self::ZigZag => "zigZag",
        }
    }
}

/// Axis label position.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum ChartAxisLabelPosition {
    #[default]
    NextTo,
    High,
    Low,
    None,
}

impl ChartAxisLabelPosition {
    #[inline]
    pub(crate) fn xml_value(&self) -> &'static str {
        match self {
            Self::NextTo => "nextTo",
            Self::High => "high",
            Self::Low => "low",
            Self::None => "none",
        }
    }
}
