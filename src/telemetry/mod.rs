//! Telemetry for conversation runs
//!
//! Collects loop and tool events in-process and renders a terminal summary.

use crate::cli::Verbosity;
use colored::Colorize;
use std::sync::{Arc, Mutex, MutexGuard};
use std::time::{Duration, Instant};

/// Telemetry event types
#[derive(Debug, Clone)]
pub enum TelemetryEvent {
    // Loop events
    StateTransition {
        from: String,
        to: String,
        timestamp: Instant,
    },
    RoundTrip {
        iteration: usize,
        duration_ms: u64,
        tool_calls: usize,
        timestamp: Instant,
    },

    // Tool events
    BatchDispatched {
        tool_count: usize,
        timestamp: Instant,
    },
    ToolStarted {
        tool: String,
        timestamp: Instant,
    },
    ToolCompleted {
        tool: String,
        duration_ms: u64,
        success: bool,
        timestamp: Instant,
    },
}

/// Telemetry statistics
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct TelemetryStats {
    pub round_trips: usize,
    pub model_time_ms: u64,
    pub batches: usize,
    pub tools_executed: usize,
    pub tools_succeeded: usize,
    pub tools_failed: usize,
    pub tool_time_ms: u64,
    pub state_transitions: usize,
}

/// Telemetry collector
#[derive(Debug, Clone)]
pub struct TelemetryCollector {
    events: Arc<Mutex<Vec<TelemetryEvent>>>,
    stats: Arc<Mutex<TelemetryStats>>,
    start_time: Instant,
}

// A panicked recorder leaves data that is still worth reporting
fn lock<T>(mutex: &Mutex<T>) -> MutexGuard<'_, T> {
    mutex.lock().unwrap_or_else(|poisoned| poisoned.into_inner())
}

impl TelemetryCollector {
    /// Create a new telemetry collector
    pub fn new() -> Self {
        Self {
            events: Arc::new(Mutex::new(Vec::new())),
            stats: Arc::new(Mutex::new(TelemetryStats::default())),
            start_time: Instant::now(),
        }
    }

    /// Record an event
    pub fn record(&self, event: TelemetryEvent) {
        {
            let mut stats = lock(&self.stats);
            match &event {
                TelemetryEvent::StateTransition { .. } => {
                    stats.state_transitions += 1;
                }
                TelemetryEvent::RoundTrip { duration_ms, .. } => {
                    stats.round_trips += 1;
                    stats.model_time_ms += duration_ms;
                }
                TelemetryEvent::BatchDispatched { .. } => {
                    stats.batches += 1;
                }
                TelemetryEvent::ToolStarted { .. } => {
                    stats.tools_executed += 1;
                }
                TelemetryEvent::ToolCompleted {
                    success,
                    duration_ms,
                    ..
                } => {
                    stats.tool_time_ms += duration_ms;
                    if *success {
                        stats.tools_succeeded += 1;
                    } else {
                        stats.tools_failed += 1;
                    }
                }
            }
        }

        lock(&self.events).push(event);
    }

    /// Get current statistics
    pub fn get_stats(&self) -> TelemetryStats {
        lock(&self.stats).clone()
    }

    /// Get elapsed time since start
    pub fn elapsed(&self) -> Duration {
        self.start_time.elapsed()
    }

    /// Get event count
    pub fn event_count(&self) -> usize {
        lock(&self.events).len()
    }

    /// Get recent events (last n)
    pub fn recent_events(&self, n: usize) -> Vec<TelemetryEvent> {
        let events = lock(&self.events);
        let start = events.len().saturating_sub(n);
        events[start..].to_vec()
    }

    /// Calculate tool success rate
    pub fn tool_success_rate(&self) -> f64 {
        let stats = lock(&self.stats);
        let total = stats.tools_succeeded + stats.tools_failed;
        if total == 0 {
            1.0
        } else {
            stats.tools_succeeded as f64 / total as f64
        }
    }
}

impl Default for TelemetryCollector {
    fn default() -> Self {
        Self::new()
    }
}

/// Terminal summary of a run
pub struct TelemetryDisplay {
    collector: TelemetryCollector,
    verbosity: Verbosity,
}

impl TelemetryDisplay {
    /// Create a new display
    pub fn new(collector: TelemetryCollector, verbosity: Verbosity) -> Self {
        Self {
            collector,
            verbosity,
        }
    }

    /// Summary lines, without color
    pub fn summary_lines(&self) -> Vec<(String, String)> {
        let stats = self.collector.get_stats();
        vec![
            ("Duration".to_string(), format!("{:.2?}", self.collector.elapsed())),
            ("Round trips".to_string(), stats.round_trips.to_string()),
            ("Model time".to_string(), format!("{}ms", stats.model_time_ms)),
            ("Tools executed".to_string(), stats.tools_executed.to_string()),
            ("Tool time".to_string(), format!("{}ms", stats.tool_time_ms)),
            (
                "Success rate".to_string(),
                format!("{:.1}%", self.collector.tool_success_rate() * 100.0),
            ),
        ]
    }

    /// Display summary statistics
    pub fn display_summary(&self) {
        if self.verbosity == Verbosity::Quiet {
            return;
        }

        println!("\n{}", "Session Summary".bold());
        println!("{}", "─".repeat(37).dimmed());
        for (label, value) in self.summary_lines() {
            println!("{:<18} {}", format!("{}:", label), value);
        }
        println!();
    }

    /// Check if should show per-tool output
    pub fn should_show_details(&self) -> bool {
        self.verbosity.show_events()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn completed(tool: &str, success: bool) -> TelemetryEvent {
        TelemetryEvent::ToolCompleted {
            tool: tool.to_string(),
            duration_ms: 100,
            success,
            timestamp: Instant::now(),
        }
    }

    #[test]
    fn test_collector_creation() {
        let collector = TelemetryCollector::new();
        assert_eq!(collector.event_count(), 0);
        assert_eq!(collector.get_stats(), TelemetryStats::default());
    }

    #[test]
    fn test_record_round_trip() {
        let collector = TelemetryCollector::new();
        collector.record(TelemetryEvent::RoundTrip {
            iteration: 1,
            duration_ms: 250,
            tool_calls: 2,
            timestamp: Instant::now(),
        });

        let stats = collector.get_stats();
        assert_eq!(stats.round_trips, 1);
        assert_eq!(stats.model_time_ms, 250);
    }

    #[test]
    fn test_record_tool_events() {
        let collector = TelemetryCollector::new();

        collector.record(TelemetryEvent::ToolStarted {
            tool: "desktop_click".to_string(),
            timestamp: Instant::now(),
        });
        collector.record(completed("desktop_click", true));

        let stats = collector.get_stats();
        assert_eq!(stats.tools_executed, 1);
        assert_eq!(stats.tools_succeeded, 1);
        assert_eq!(stats.tools_failed, 0);
        assert_eq!(stats.tool_time_ms, 100);
    }

    #[test]
    fn test_tool_success_rate() {
        let collector = TelemetryCollector::new();
        assert_eq!(collector.tool_success_rate(), 1.0);

        collector.record(completed("a", true));
        collector.record(completed("b", true));
        collector.record(completed("c", false));

        let rate = collector.tool_success_rate();
        assert!((rate - 0.666).abs() < 0.01);
    }

    #[test]
    fn test_recent_events() {
        let collector = TelemetryCollector::new();
        for i in 0..10 {
            collector.record(TelemetryEvent::BatchDispatched {
                tool_count: i,
                timestamp: Instant::now(),
            });
        }

        assert_eq!(collector.recent_events(3).len(), 3);
        assert_eq!(collector.get_stats().batches, 10);
    }

    #[test]
    fn test_clones_share_state() {
        let collector = TelemetryCollector::new();
        let clone = collector.clone();
        clone.record(completed("x", false));

        assert_eq!(collector.get_stats().tools_failed, 1);
    }

    #[test]
    fn test_summary_lines() {
        let collector = TelemetryCollector::new();
        collector.record(completed("x", true));
        let display = TelemetryDisplay::new(collector, Verbosity::Normal);

        let lines = display.summary_lines();
        assert!(lines.iter().any(|(label, value)| label == "Success rate" && value == "100.0%"));
        assert!(!display.should_show_details());
    }
}
