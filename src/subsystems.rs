//! Built-in strategy registration. Every strategy constructor is listed here.
//!
//! Adding a new strategy: append one entry to `STRATEGIES`.

use crate::core::error::NfdError;
use crate::core::name::Name;
use crate::core::strategy::Strategy;
use crate::core::strategy_choice::StrategyChoice;
use crate::plugins::{best_route, broadcast};

pub struct StrategyInit {
    /// StrategyId in URI form.
    pub name: &'static str,
    pub create: fn(Name) -> Box<dyn Strategy>,
}

pub const STRATEGIES: &[StrategyInit] = &[
    StrategyInit { name: best_route::STRATEGY_NAME, create: best_route::create },
    StrategyInit { name: broadcast::STRATEGY_NAME, create: broadcast::create },
];

fn lookup(id: &Name) -> Result<Option<&'static StrategyInit>, NfdError> {
    for init in STRATEGIES {
        if init.name.parse::<Name>()? == *id {
            return Ok(Some(init));
        }
    }
    Ok(None)
}

/// Builds a table with every built-in strategy installed and `default_strategy`
/// assigned to root.
pub fn builtin_table(default_strategy: &Name) -> Result<StrategyChoice, NfdError> {
    let init = lookup(default_strategy)?
        .ok_or_else(|| NfdError::UnknownStrategy(default_strategy.clone()))?;
    let mut table = StrategyChoice::new((init.create)(default_strategy.clone()));
    for other in STRATEGIES {
        let id: Name = other.name.parse()?;
        if id != *default_strategy {
            table.install((other.create)(id))?;
        }
    }
    Ok(table)
}
