//! Running state carried from one projected month to the next

/// Balance state between months
#[derive(Debug, Clone)]
pub struct ProjectionState {
    /// Index of the next month to project (0-based)
    pub month_index: u32,

    /// Ending balance of the last projected month (starting balance before month 0)
    pub balance: f64,
}

impl ProjectionState {
    pub fn new(starting_balance: f64) -> Self {
        Self {
            month_index: 0,
            balance: starting_balance,
        }
    }

    /// Number of growth periods applied to a baseline in the current month.
    /// Baselines are month -1 amounts, so month 0 carries one period.
    pub fn growth_periods(&self) -> f64 {
        (self.month_index + 1) as f64
    }

    /// Post this month's net cash flow and advance.
    /// Returns (opening, ending) balance for the month just closed.
    pub fn close_month(&mut self, net_cash_flow: f64) -> (f64, f64) {
        let opening = self.balance;
        self.balance = opening + net_cash_flow;
        self.month_index += 1;
        (opening, self.balance)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_close_month_rolls_balance_forward() {
        let mut state = ProjectionState::new(-50.0);
        assert_eq!(state.growth_periods(), 1.0);

        assert_eq!(state.close_month(80.0), (-50.0, 30.0));
        assert_eq!(state.close_month(-10.0), (30.0, 20.0));
        assert_eq!(state.month_index, 2);
        assert_eq!(state.growth_periods(), 3.0);
    }
}
