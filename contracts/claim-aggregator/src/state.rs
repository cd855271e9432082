use cosmwasm_schema::cw_serde;
use cosmwasm_std::Addr;
use cw_storage_plus::Item;

pub const CONFIG: Item<AggregatorConfig> = Item::new("config");

#[cw_serde]
pub struct AggregatorConfig {
    /// Fixed at instantiation. The aggregator must hold the claim helper
    /// role on every engine in this list.
    pub engines: Vec<Addr>,
}
