// findash-widgets/src/spending.rs
use findash_core::{ConfigBag, config_bag};

use crate::catalog::ids;
use crate::settings::{WidgetSettings, count_or, text_or};

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum ChartKind {
    #[default]
    Bar,
    Line,
    Pie,
}

impl ChartKind {
    pub fn as_str(self) -> &'static str {
        match self {
            ChartKind::Bar => "bar",
            ChartKind::Line => "line",
            ChartKind::Pie => "pie",
        }
    }

    pub fn parse(value: &str) -> Option<Self> {
        match value {
            "bar" => Some(ChartKind::Bar),
            "line" => Some(ChartKind::Line),
            "pie" => Some(ChartKind::Pie),
            _ => None,
        }
    }
}

/// Spending breakdown over a trailing window of months
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SpendingSettings {
    pub chart: ChartKind,
    pub months: u32,
}

impl Default for SpendingSettings {
    fn default() -> Self {
        Self {
            chart: ChartKind::default(),
            months: 6,
        }
    }
}

impl WidgetSettings for SpendingSettings {
    const WIDGET_ID: &'static str = ids::SPENDING;

    fn from_bag(bag: &ConfigBag) -> Self {
        let defaults = Self::default();
        let chart = text_or(bag, "chart", defaults.chart.as_str());
        Self {
            chart: ChartKind::parse(&chart).unwrap_or(defaults.chart),
            months: count_or(bag, "months", defaults.months, 24).max(1),
        }
    }

    fn to_bag(&self) -> ConfigBag {
        config_bag! {
            "chart" => self.chart.as_str(),
            "months" => self.months,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_unknown_chart_falls_back() {
        let settings = SpendingSettings::from_bag(&config_bag! { "chart" => "radar", "months" => 12u32 });
        assert_eq!(settings.chart, ChartKind::Bar);
        assert_eq!(settings.months, 12);
    }

    #[test]
    fn test_chart_kind_parse() {
        for kind in [ChartKind::Bar, ChartKind::Line, ChartKind::Pie] {
            assert_eq!(ChartKind::parse(kind.as_str()), Some(kind));
        }
    }
}
