pub mod math;
pub mod types;

pub use math::{
    accrued_rewards, amount_for_shares, apply_premium, bps_share, index_increment, scale_rate,
    shares_for_amount, weighted_timestamp, SCALE,
};
pub use types::{PowerType, Role};
