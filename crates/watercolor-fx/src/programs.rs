//! Built-in WGSL programs. Each shares the vertex stage and bindings in
//! `shaders/common.wgsl`.

use crate::feedback::{T_CURRENT, T_DIFFUSE, T_PREV};
use crate::scene::ProgramDesc;

macro_rules! wgsl {
    ($file:literal) => {
        concat!(include_str!("shaders/common.wgsl"), "\n", include_str!(concat!("shaders/", $file)))
    };
}

/// Lit cube whose hue cycles with `uTime`.
pub fn cube() -> ProgramDesc {
    ProgramDesc {
        label: "cube",
        source: wgsl!("cube.wgsl"),
        texture_slots: [None, None],
        depth_test: true,
    }
}

/// Unlit `uColor`.
pub fn flat() -> ProgramDesc {
    ProgramDesc {
        label: "flat",
        source: wgsl!("flat.wgsl"),
        texture_slots: [None, None],
        depth_test: true,
    }
}

/// Grainy paper in `uColor`; seeds the feedback loop.
pub fn paper() -> ProgramDesc {
    ProgramDesc {
        label: "paper",
        source: wgsl!("paper.wgsl"),
        texture_slots: [None, None],
        depth_test: false,
    }
}

pub fn processing() -> ProgramDesc {
    ProgramDesc {
        label: "processing",
        source: wgsl!("processing.wgsl"),
        texture_slots: [Some(T_CURRENT), Some(T_PREV)],
        depth_test: false,
    }
}

pub fn composite() -> ProgramDesc {
    ProgramDesc {
        label: "composite",
        source: wgsl!("composite.wgsl"),
        texture_slots: [Some(T_DIFFUSE), None],
        depth_test: false,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn every_program_carries_the_shared_stage() {
        for p in [cube(), flat(), paper(), processing(), composite()] {
            assert!(p.source.contains("fn vs_main"), "{}", p.label);
            assert!(p.source.contains("fn fs_main"), "{}", p.label);
        }
    }

    #[test]
    fn only_feedback_passes_sample_targets() {
        assert_eq!(processing().texture_slots, [Some("tCurrent"), Some("tPrev")]);
        assert_eq!(composite().texture_slots[0], Some("tDiffuse"));
        assert!(cube().texture_slots.iter().all(Option::is_none));
    }
}
