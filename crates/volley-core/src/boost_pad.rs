use serde::{Deserialize, Serialize};

use crate::Vector3;

/// A boost pad on the field.
#[derive(Serialize, Deserialize, Clone, Copy, Debug, PartialEq)]
pub struct BoostPad {
    pub id: usize,
    pub position: Vector3,
    /// Large pads refill to 100, small ones give 12.
    pub large: bool,
    pub available: bool,
}

/// Read-only list of the pads of the current arena and whether they are up.
#[derive(Serialize, Deserialize, Clone, Debug, Default, PartialEq)]
pub struct BoostPadRegistry {
    pads: Vec<BoostPad>,
}

impl BoostPadRegistry {
    const LARGE_PADS: [(f64, f64); 6] = [
        (-3584.0, 0.0),
        (3584.0, 0.0),
        (-3072.0, 4096.0),
        (3072.0, 4096.0),
        (-3072.0, -4096.0),
        (3072.0, -4096.0),
    ];

    pub fn new(pads: Vec<BoostPad>) -> Self {
        Self { pads }
    }

    /// The six large pads of a standard arena, all available.
    pub fn standard() -> Self {
        let pads = Self::LARGE_PADS
            .iter()
            .enumerate()
            .map(|(id, &(x, y))| BoostPad {
                id,
                position: Vector3::new(x, y, 73.0),
                large: true,
                available: true,
            })
            .collect();
        Self { pads }
    }

    /// Mark a pad as taken or respawned. Unknown ids are ignored.
    pub fn set_available(&mut self, id: usize, available: bool) {
        if let Some(pad) = self.pads.iter_mut().find(|pad| pad.id == id) {
            pad.available = available;
        }
    }

    pub fn pads(&self) -> &[BoostPad] {
        &self.pads
    }

    pub fn available(&self) -> impl Iterator<Item = &BoostPad> {
        self.pads.iter().filter(|pad| pad.available)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_standard_layout_is_symmetric() {
        let registry = BoostPadRegistry::standard();
        assert_eq!(registry.pads().len(), 6);
        let sum = registry
            .pads()
            .iter()
            .fold(Vector3::zeros(), |acc, pad| acc + pad.position);
        assert_eq!(sum.x, 0.0);
        assert_eq!(sum.y, 0.0);
    }

    #[test]
    fn test_set_available() {
        let mut registry = BoostPadRegistry::standard();
        registry.set_available(2, false);
        registry.set_available(99, false);
        assert_eq!(registry.available().count(), 5);
        assert!(registry.available().all(|pad| pad.id != 2));
    }
}
