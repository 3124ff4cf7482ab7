//! Line charts for the aggregate CPU / memory history.
//!
//! Each surface keeps one chart model that is built from the history the first
//! time and then refilled in place on every later render.

use ratatui::{
    layout::Rect,
    style::{Color, Style},
    symbols::Marker,
    text::Span,
    widgets::{Axis, Block, Borders, Chart, Dataset, GraphType, Paragraph},
};

use crate::history::History;
use crate::ui::theme::{AXIS, CPU_LINE, MEM_LINE};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Metric {
    Cpu,
    Memory,
}

impl Metric {
    fn title(self) -> &'static str {
        match self {
            Metric::Cpu => "CPU usage",
            Metric::Memory => "Memory usage",
        }
    }

    fn color(self) -> Color {
        match self {
            Metric::Cpu => CPU_LINE,
            Metric::Memory => MEM_LINE,
        }
    }

    fn series(self, h: &History) -> Vec<u64> {
        match self {
            Metric::Cpu => h.cpu_series(),
            Metric::Memory => h.memory_series(),
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct ChartModel {
    pub labels: Vec<String>,
    pub points: Vec<(f64, f64)>,
}

impl ChartModel {
    fn fill(&mut self, metric: Metric, h: &History) {
        self.labels.clear();
        self.labels.extend(h.labels());
        self.points.clear();
        self.points.extend(
            metric
                .series(h)
                .into_iter()
                .enumerate()
                .map(|(i, v)| (i as f64, v as f64)),
        );
    }
}

#[derive(Debug, Clone)]
pub struct ChartAdapter {
    metric: Metric,
    model: Option<ChartModel>,
    builds: usize,
}

impl ChartAdapter {
    pub fn new(metric: Metric) -> Self {
        Self {
            metric,
            model: None,
            builds: 0,
        }
    }

    pub fn render(&mut self, h: &History) {
        match self.model.as_mut() {
            Some(m) => m.fill(self.metric, h),
            None => {
                let mut m = ChartModel {
                    labels: Vec::with_capacity(h.capacity()),
                    points: Vec::with_capacity(h.capacity()),
                };
                m.fill(self.metric, h);
                self.model = Some(m);
                self.builds += 1;
            }
        }
    }

    pub fn model(&self) -> Option<&ChartModel> {
        self.model.as_ref()
    }

    /// How many times a model was constructed (1 after the first render).
    pub fn builds(&self) -> usize {
        self.builds
    }

    pub fn draw(&self, f: &mut ratatui::Frame<'_>, area: Rect) {
        let now = self
            .model
            .as_ref()
            .and_then(|m| m.points.last())
            .map(|&(_, v)| format!("{} (now: {v:.0}%)", self.metric.title()))
            .unwrap_or_else(|| self.metric.title().to_string());
        let block = Block::default().borders(Borders::ALL).title(now);

        let Some(m) = self.model.as_ref().filter(|m| !m.points.is_empty()) else {
            f.render_widget(
                Paragraph::new("waiting for online devices...")
                    .style(Style::default().fg(AXIS))
                    .block(block),
                area,
            );
            return;
        };

        let ds = Dataset::default()
            .marker(Marker::Braille)
            .graph_type(GraphType::Line)
            .style(Style::default().fg(self.metric.color()))
            .data(&m.points);

        let x_max = (m.points.len().saturating_sub(1)).max(1) as f64;
        let chart = Chart::new(vec![ds])
            .block(block)
            .x_axis(
                Axis::default()
                    .style(Style::default().fg(AXIS))
                    .bounds([0.0, x_max])
                    .labels(x_labels(&m.labels)),
            )
            .y_axis(
                Axis::default()
                    .style(Style::default().fg(AXIS))
                    .bounds([0.0, 100.0])
                    .labels(vec![Span::raw("0%"), Span::raw("50%"), Span::raw("100%")]),
            );
        f.render_widget(chart, area);
    }
}

// First, middle and last timestamps; fewer when there are fewer points.
fn x_labels(labels: &[String]) -> Vec<Span<'static>> {
    match labels.len() {
        0 => vec![],
        1 | 2 => labels.iter().map(|l| Span::raw(l.clone())).collect(),
        n => [0, n / 2, n - 1]
            .iter()
            .map(|&i| Span::raw(labels[i].clone()))
            .collect(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::history::Sample;

    fn history(n: u64) -> History {
        let mut h = History::default();
        for i in 0..n {
            h.append(Sample {
                timestamp: format!("10:00:{:02}", i),
                cpu: i * 2,
                memory: 100 - i,
            });
        }
        h
    }

    #[test]
    fn render_is_idempotent_and_reuses_model() {
        let h = history(5);
        let mut a = ChartAdapter::new(Metric::Cpu);
        a.render(&h);
        let first = a.model().cloned().unwrap();
        a.render(&h);
        let second = a.model().cloned().unwrap();
        assert_eq!(first, second);
        assert_eq!(a.builds(), 1);
        assert_eq!(first.labels.len(), 5);
        assert_eq!(first.points[4], (4.0, 8.0));
    }

    #[test]
    fn later_renders_replace_data_in_place() {
        let mut a = ChartAdapter::new(Metric::Memory);
        a.render(&history(3));
        a.render(&history(25));
        let m = a.model().unwrap();
        assert_eq!(a.builds(), 1);
        assert_eq!(m.points.len(), 20);
        assert_eq!(m.labels.first().map(String::as_str), Some("10:00:05"));
        assert_eq!(m.points.last(), Some(&(19.0, 76.0)));
    }

    #[test]
    fn axis_labels_pick_ends_and_middle() {
        let labels: Vec<String> = (0..7).map(|i| format!("t{i}")).collect();
        let spans = x_labels(&labels);
        let text: Vec<String> = spans.iter().map(|s| s.content.to_string()).collect();
        assert_eq!(text, vec!["t0", "t3", "t6"]);
    }
}
