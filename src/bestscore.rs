//! Best-score persistence
//!
//! One small record in LocalStorage: best climb height (free-roam) and best
//! finish time (race). Storage failures are silently ignored; the in-memory
//! value stays authoritative for the session.

use serde::{Deserialize, Serialize};

/// Persisted best values for both modes
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct BestScore {
    /// Highest point reached in free-roam (meters above spawn)
    pub best_height: f32,
    /// Fastest race finish (seconds)
    pub best_time: Option<f32>,
}

impl BestScore {
    /// LocalStorage key (used only in wasm32)
    #[allow(dead_code)]
    const STORAGE_KEY: &'static str = "tower_rush_best";

    pub fn new() -> Self {
        Self::default()
    }

    /// Record a climb height; returns true if it beat the stored best
    pub fn record_height(&mut self, height: f32) -> bool {
        if height > self.best_height {
            self.best_height = height;
            true
        } else {
            false
        }
    }

    /// Record a finish time; returns true only if strictly faster
    pub fn record_time(&mut self, time: f32) -> bool {
        match self.best_time {
            Some(best) if time >= best => false,
            _ => {
                self.best_time = Some(time);
                true
            }
        }
    }

    /// Load from LocalStorage (WASM only)
    #[cfg(target_arch = "wasm32")]
    pub fn load() -> Self {
        let storage = web_sys::window()
            .and_then(|w| w.local_storage().ok())
            .flatten();

        if let Some(storage) = storage {
            if let Ok(Some(json)) = storage.get_item(Self::STORAGE_KEY) {
                if let Ok(best) = serde_json::from_str::<BestScore>(&json) {
                    log::info!("Loaded best score: {:.1}m", best.best_height);
                    return best;
                }
            }
        }

        log::info!("No best score found, starting fresh");
        Self::new()
    }

    /// Save to LocalStorage (WASM only)
    #[cfg(target_arch = "wasm32")]
    pub fn save(&self) {
        let storage = web_sys::window()
            .and_then(|w| w.local_storage().ok())
            .flatten();

        if let Some(storage) = storage {
            if let Ok(json) = serde_json::to_string(self) {
                let _ = storage.set_item(Self::STORAGE_KEY, &json);
            }
        }
    }

    /// Native stubs
    #[cfg(not(target_arch = "wasm32"))]
    pub fn load() -> Self {
        Self::new()
    }

    #[cfg(not(target_arch = "wasm32"))]
    pub fn save(&self) {
        // No-op for native
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn height_only_improves_upward() {
        let mut best = BestScore::new();
        assert!(best.record_height(12.5));
        assert!(!best.record_height(12.5));
        assert!(!best.record_height(8.0));
        assert!(best.record_height(30.0));
        assert_eq!(best.best_height, 30.0);
    }

    #[test]
    fn time_only_improves_downward() {
        let mut best = BestScore::new();
        assert!(best.record_time(45.0));
        assert!(!best.record_time(45.0));
        assert!(!best.record_time(60.0));
        assert!(best.record_time(30.0));
        assert_eq!(best.best_time, Some(30.0));
    }

    #[test]
    fn round_trips_through_json() {
        let mut best = BestScore::new();
        best.record_height(77.3);
        best.record_time(21.0);
        let json = serde_json::to_string(&best).unwrap();
        let back: BestScore = serde_json::from_str(&json).unwrap();
        assert_eq!(back.best_height, best.best_height);
        assert_eq!(back.best_time, best.best_time);
    }
}
