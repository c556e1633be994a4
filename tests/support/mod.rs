//! Shared fixtures: a recording host, a scripted dialog and frame files.

#![allow(dead_code)]

use std::{
    collections::HashMap,
    path::{Path, PathBuf},
};

use image::{GrayImage, Luma, Rgb, RgbImage};
use image_context_maker::{ConfigureDialog, DialogDriver, StepHost};

/// A workflow whose identifiers are counted from `identifiers`.
#[derive(Default)]
pub struct FakeWorkflow {
    pub identifiers: HashMap<String, usize>,
    pub executions: Vec<String>,
    pub configured_signals: Vec<(String, bool)>,
}

impl FakeWorkflow {
    pub fn with_identifiers(identifiers: &[&str]) -> Self {
        let mut workflow = Self::default();
        for identifier in identifiers {
            *workflow.identifiers.entry(identifier.to_string()).or_default() += 1;
        }
        workflow
    }
}

impl StepHost for FakeWorkflow {
    fn identifier_occurs_count(&self, identifier: &str) -> usize {
        self.identifiers.get(identifier).copied().unwrap_or(0)
    }

    fn execution_done(&mut self, identifier: &str) {
        self.executions.push(identifier.to_string());
    }

    fn configured_changed(&mut self, identifier: &str, configured: bool) {
        self.configured_signals.push((identifier.to_string(), configured));
    }
}

/// Types an identifier and frame rate into the dialog, then confirms.
pub struct TypeAndConfirm {
    pub identifier: String,
    pub frames_per_second: f64,
}

impl DialogDriver for TypeAndConfirm {
    fn exec(&mut self, dialog: &mut ConfigureDialog<'_>) -> bool {
        dialog.set_identifier(self.identifier.clone());
        dialog.set_frames_per_second(self.frames_per_second);
        true
    }
}

pub fn write_gray_frames(dir: &Path, prefix: &str, count: usize, width: u32, height: u32) -> Vec<PathBuf> {
    (0..count)
        .map(|index| {
            let path = dir.join(format!("{prefix}{index}.png"));
            GrayImage::from_pixel(width, height, Luma([(index * 25 % 256) as u8]))
                .save(&path)
                .expect("should write a grayscale frame");
            path
        })
        .collect()
}

pub fn write_rgb_frame(path: &Path, width: u32, height: u32) {
    RgbImage::from_pixel(width, height, Rgb([200, 10, 10]))
        .save(path)
        .expect("should write a colour frame");
}
