use std::fmt;

use serde::{Deserialize, Serialize};

/// Card feature a sorting rule can key on
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum CardRule {
    Color,
    Shape,
    Quantity,
}

impl CardRule {
    pub const ALL: [CardRule; 3] = [CardRule::Color, CardRule::Shape, CardRule::Quantity];

    pub fn index(self) -> usize {
        match self {
            CardRule::Color => 0,
            CardRule::Shape => 1,
            CardRule::Quantity => 2,
        }
    }

    /// The two rules a rotation may switch to from `self`
    pub fn others(self) -> [CardRule; 2] {
        match self {
            CardRule::Color => [CardRule::Shape, CardRule::Quantity],
            CardRule::Shape => [CardRule::Color, CardRule::Quantity],
            CardRule::Quantity => [CardRule::Color, CardRule::Shape],
        }
    }

    pub fn name(self) -> &'static str {
        match self {
            CardRule::Color => "color",
            CardRule::Shape => "shape",
            CardRule::Quantity => "quantity",
        }
    }
}

impl fmt::Display for CardRule {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// One sorting card: a feature value per dimension, fixed for the trial
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct WisconsinCard {
    features: [u8; 3],
}

impl WisconsinCard {
    pub fn new(color: u8, shape: u8, quantity: u8) -> Self {
        Self {
            features: [color, shape, quantity],
        }
    }

    /// Feature value at the dimension the given rule keys on
    pub fn feature(&self, rule: CardRule) -> u8 {
        self.features[rule.index()]
    }
}
