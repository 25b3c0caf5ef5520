// SPDX-License-Identifier: PMPL-1.0-or-later
// Copyright (c) 2026 Jonathan D.A. Jewell (hyperpolymath) <jonathan.jewell@open.ac.uk>
//
// Display adaptations (dyslexia font, high contrast, colour inversion).
//
// Owned by the service layer and handed to whoever renders. Independent of
// the conversion session: nothing here is reset by a new conversion.

use std::sync::atomic::{AtomicBool, Ordering};

use tracing::info;

use accesshub_core::types::AccessibilityState;

/// Class applied to simplified content when the dyslexia font is on.
pub const DYSLEXIC_FONT_CLASS: &str = "font-dyslexic";
pub const HIGH_CONTRAST_CLASS: &str = "theme-high-contrast";
pub const INVERTED_CLASS: &str = "theme-inverted";

#[derive(Debug, Default)]
pub struct AccessibilitySettings {
    dyslexic_font: AtomicBool,
    high_contrast: AtomicBool,
    color_inverted: AtomicBool,
}

impl AccessibilitySettings {
    pub fn new(initial: AccessibilityState) -> Self {
        Self {
            dyslexic_font: AtomicBool::new(initial.dyslexic_font_enabled),
            high_contrast: AtomicBool::new(initial.high_contrast_enabled),
            color_inverted: AtomicBool::new(initial.color_inverted_enabled),
        }
    }

    /// Returns the new value.
    pub fn toggle_dyslexic_font(&self) -> bool {
        let enabled = flip(&self.dyslexic_font);
        info!(enabled, "dyslexia font toggled");
        enabled
    }

    pub fn toggle_high_contrast(&self) -> bool {
        let enabled = flip(&self.high_contrast);
        info!(enabled, "high contrast toggled");
        enabled
    }

    pub fn toggle_color_inversion(&self) -> bool {
        let enabled = flip(&self.color_inverted);
        info!(enabled, "colour inversion toggled");
        enabled
    }

    pub fn snapshot(&self) -> AccessibilityState {
        AccessibilityState {
            dyslexic_font_enabled: self.dyslexic_font.load(Ordering::SeqCst),
            high_contrast_enabled: self.high_contrast.load(Ordering::SeqCst),
            color_inverted_enabled: self.color_inverted.load(Ordering::SeqCst),
        }
    }
}

fn flip(flag: &AtomicBool) -> bool {
    !flag.fetch_xor(true, Ordering::SeqCst)
}

/// Theme classes for the results container.
pub fn container_classes(state: AccessibilityState) -> Vec<&'static str> {
    let mut classes = Vec::new();
    if state.high_contrast_enabled {
        classes.push(HIGH_CONTRAST_CLASS);
    }
    if state.color_inverted_enabled {
        classes.push(INVERTED_CLASS);
    }
    classes
}

/// Classes for the simplified content block.
pub fn content_classes(state: AccessibilityState) -> Vec<&'static str> {
    if state.dyslexic_font_enabled {
        vec![DYSLEXIC_FONT_CLASS]
    } else {
        Vec::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn starts_all_off() {
        assert_eq!(
            AccessibilitySettings::default().snapshot(),
            AccessibilityState::default()
        );
    }

    #[test]
    fn toggles_are_independent() {
        let settings = AccessibilitySettings::default();
        assert!(settings.toggle_high_contrast());
        let state = settings.snapshot();
        assert!(state.high_contrast_enabled);
        assert!(!state.color_inverted_enabled);
        assert!(!state.dyslexic_font_enabled);

        assert!(settings.toggle_color_inversion());
        assert!(!settings.toggle_high_contrast());
        let state = settings.snapshot();
        assert!(!state.high_contrast_enabled);
        assert!(state.color_inverted_enabled);
    }

    #[test]
    fn toggling_twice_restores() {
        let settings = AccessibilitySettings::default();
        settings.toggle_dyslexic_font();
        settings.toggle_dyslexic_font();
        assert!(!settings.snapshot().dyslexic_font_enabled);
    }

    #[test]
    fn initial_state_is_respected() {
        let settings = AccessibilitySettings::new(AccessibilityState {
            dyslexic_font_enabled: true,
            ..Default::default()
        });
        assert!(settings.snapshot().dyslexic_font_enabled);
    }

    #[test]
    fn classes_follow_flags() {
        let state = AccessibilityState {
            dyslexic_font_enabled: true,
            high_contrast_enabled: true,
            color_inverted_enabled: true,
        };
        assert_eq!(container_classes(state), [HIGH_CONTRAST_CLASS, INVERTED_CLASS]);
        assert_eq!(content_classes(state), [DYSLEXIC_FONT_CLASS]);
        assert!(container_classes(AccessibilityState::default()).is_empty());
    }
}
