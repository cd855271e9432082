use cosmwasm_schema::cw_serde;

/// The two independently delegatable governance power types.
#[cw_serde]
pub enum PowerType {
    Voting,
    Proposition,
}

impl PowerType {
    pub const ALL: [PowerType; 2] = [PowerType::Voting, PowerType::Proposition];

    /// Storage key discriminant.
    pub fn index(&self) -> u8 {
        match self {
            PowerType::Voting => 0,
            PowerType::Proposition => 1,
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            PowerType::Voting => "voting",
            PowerType::Proposition => "proposition",
        }
    }
}

/// Named admin slots, each transferable via a two-phase propose/claim handshake.
#[cw_serde]
pub enum Role {
    SlashingAdmin,
    CooldownAdmin,
    ClaimHelper,
}

impl Role {
    /// Storage key for the role's admin record.
    pub fn key(&self) -> &'static str {
        match self {
            Role::SlashingAdmin => "slashing_admin",
            Role::CooldownAdmin => "cooldown_admin",
            Role::ClaimHelper => "claim_helper",
        }
    }
}
