use core::{
    fmt::{Display, Formatter, Result as FmtResult},
    str::FromStr,
};
use std::collections::BTreeMap;

use harness_types::{Address, H160};

use crate::{codec::PrecompileCall, Error, SelectorTable, Word};

const STAKING: &[&str] = &[
    "min_nomination()",
    "max_nominations_per_nominator()",
    "candidate_count()",
    "round_info()",
    "is_nominator(address)",
    "is_candidate(address,uint256)",
    "is_selected_candidate(address,uint256)",
    "nominator_state(address)",
    "candidate_state(address)",
    "nominate(address,uint256,uint256,uint256)",
    "nominator_bond_more(address,uint256)",
    "nominator_bond_less(address,uint256)",
    "schedule_leave_nominators()",
    "execute_leave_nominators(uint256)",
    "cancel_leave_nominators()",
    "schedule_revoke_nomination(address)",
    "join_candidates(address,address,uint256,uint256)",
    "candidate_bond_more(uint256)",
    "schedule_leave_candidates(uint256)",
];

const RELAY_MANAGER: &[&str] = &[
    "relayer_pool()",
    "selected_relayers(bool)",
    "latest_round()",
    "majority(bool)",
    "is_relayer(address)",
    "is_selected_relayer(address,bool)",
    "heartbeat()",
    "set_relayer(address)",
];

const OFFENCES: &[&str] = &[
    "offence_expiration_in_rounds()",
    "validator_offence(address)",
    "validator_offences(address[])",
];

const GOVERNANCE: &[&str] = &[
    "public_prop_count()",
    "deposit_of(uint256)",
    "voting_of(uint256)",
    "ongoing_referendum_info(uint256)",
    "propose(bytes32,uint256)",
    "second(uint256,uint256)",
    "vote(uint256,bool,uint256,uint256)",
    "remove_vote(uint256)",
    "delegate(address,uint256,uint256)",
    "un_delegate()",
];

const BALANCES: &[&str] = &[
    "name()",
    "symbol()",
    "decimals()",
    "totalSupply()",
    "balanceOf(address)",
    "allowance(address,address)",
    "transfer(address,uint256)",
    "approve(address,uint256)",
    "transferFrom(address,address,uint256)",
];

const fn precompile_address(index: u16) -> Address {
    let index = index.to_be_bytes();
    let mut address = [0u8; 20];
    address[18] = index[0];
    address[19] = index[1];
    H160(address)
}

/// The chain's fixed-address precompiles.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, serde::Serialize, serde::Deserialize,
)]
#[serde(rename_all = "kebab-case")]
pub enum Precompile {
    Balances,
    Staking,
    Offences,
    Governance,
    RelayManager,
}

impl Precompile {
    pub const ALL: [Self; 5] =
        [Self::Balances, Self::Staking, Self::Offences, Self::Governance, Self::RelayManager];

    #[must_use]
    pub const fn address(self) -> Address {
        match self {
            Self::Balances => precompile_address(0x0100),
            Self::Staking => precompile_address(0x0400),
            Self::Offences => precompile_address(0x0500),
            Self::Governance => precompile_address(0x0800),
            Self::RelayManager => precompile_address(0x2000),
        }
    }

    #[must_use]
    pub const fn name(self) -> &'static str {
        match self {
            Self::Balances => "balances",
            Self::Staking => "staking",
            Self::Offences => "offences",
            Self::Governance => "governance",
            Self::RelayManager => "relay-manager",
        }
    }

    /// Canonical interface description: one solidity signature per function.
    #[must_use]
    pub const fn signatures(self) -> &'static [&'static str] {
        match self {
            Self::Balances => BALANCES,
            Self::Staking => STAKING,
            Self::Offences => OFFENCES,
            Self::Governance => GOVERNANCE,
            Self::RelayManager => RELAY_MANAGER,
        }
    }

    #[must_use]
    pub fn from_address(address: Address) -> Option<Self> {
        Self::ALL.into_iter().find(|precompile| precompile.address() == address)
    }

    /// # Errors
    /// Fails if the interface description is malformed.
    pub fn selector_table(self) -> Result<SelectorTable, Error> {
        SelectorTable::from_signatures(self.signatures())
    }

    /// Call of `name` on this precompile. Builds the selector table on each invocation, use
    /// [`PrecompileSet`] when calling repeatedly.
    ///
    /// # Errors
    /// Returns [`Error::UnknownSelector`] if the precompile has no such function.
    pub fn call<I>(self, name: &str, params: I) -> Result<PrecompileCall, Error>
    where
        I: IntoIterator<Item = Word>,
    {
        let selector = self.selector_table()?.selector(name)?;
        Ok(PrecompileCall::new(self.address(), selector).with_params(params))
    }
}

impl Display for Precompile {
    fn fmt(&self, f: &mut Formatter<'_>) -> FmtResult {
        f.write_str(self.name())
    }
}

impl FromStr for Precompile {
    type Err = Error;

    fn from_str(name: &str) -> Result<Self, Self::Err> {
        Self::ALL
            .into_iter()
            .find(|precompile| precompile.name() == name)
            .ok_or_else(|| Error::UnknownPrecompile(name.to_string()))
    }
}

/// Selector tables of every precompile, generated once.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PrecompileSet {
    tables: BTreeMap<Precompile, SelectorTable>,
}

impl PrecompileSet {
    /// # Errors
    /// Fails if any interface description is malformed.
    pub fn new() -> Result<Self, Error> {
        let tables = Precompile::ALL
            .into_iter()
            .map(|precompile| Ok((precompile, precompile.selector_table()?)))
            .collect::<Result<BTreeMap<_, _>, Error>>()?;
        Ok(Self { tables })
    }

    #[must_use]
    pub fn table(&self, precompile: Precompile) -> Option<&SelectorTable> {
        self.tables.get(&precompile)
    }

    /// # Errors
    /// Returns [`Error::UnknownSelector`] if the precompile has no such function.
    pub fn call<I>(
        &self,
        precompile: Precompile,
        name: &str,
        params: I,
    ) -> Result<PrecompileCall, Error>
    where
        I: IntoIterator<Item = Word>,
    {
        let selector = self
            .table(precompile)
            .ok_or_else(|| Error::UnknownPrecompile(precompile.to_string()))?
            .selector(name)?;
        Ok(PrecompileCall::new(precompile.address(), selector).with_params(params))
    }

    /// Labels calldata sent to `target` as `precompile.function`.
    #[must_use]
    pub fn describe(&self, target: Address, calldata: &[u8]) -> Option<(Precompile, &str)> {
        let precompile = Precompile::from_address(target)?;
        let selector: [u8; 4] = calldata.get(..4)?.try_into().ok()?;
        let name = self.table(precompile)?.name_of(crate::Selector(selector))?;
        Some((precompile, name))
    }
}

#[cfg(test)]
mod tests {
    use super::{Precompile, PrecompileSet};
    use crate::{Error, Selector, Word};
    use harness_types::Address;
    use hex_literal::hex;

    #[test]
    fn addresses_are_distinct() {
        assert_eq!(
            Precompile::Staking.address(),
            Address::from(hex!("0000000000000000000000000000000000000400"))
        );
        assert_eq!(
            Precompile::RelayManager.address(),
            Address::from(hex!("0000000000000000000000000000000000002000"))
        );
        for precompile in Precompile::ALL {
            assert_eq!(Precompile::from_address(precompile.address()), Some(precompile));
            assert_eq!(precompile.name().parse::<Precompile>().unwrap(), precompile);
        }
        assert_eq!(Precompile::from_address(Address::zero()), None);
        assert!(matches!("treasury".parse::<Precompile>(), Err(Error::UnknownPrecompile(_))));
    }

    #[test]
    fn every_interface_builds() {
        let set = PrecompileSet::new().unwrap();
        for precompile in Precompile::ALL {
            let table = set.table(precompile).unwrap();
            assert_eq!(table.len(), precompile.signatures().len());
        }
        let balances = set.table(Precompile::Balances).unwrap();
        assert_eq!(balances.get("totalSupply"), Some(Selector(hex!("18160ddd"))));
        let relay = set.table(Precompile::RelayManager).unwrap();
        assert_eq!(relay.get("is_relayer"), Some(Selector(hex!("976a75f1"))));
    }

    #[test]
    fn builds_calls_by_name() {
        let set = PrecompileSet::new().unwrap();
        let alith = Address::from(hex!("f24ff3a9cf04c71dbc94d0b566f7a27b94566cac"));
        let call = set.call(Precompile::Staking, "is_nominator", [Word::from(alith)]).unwrap();
        assert_eq!(call.target, Precompile::Staking.address());
        assert_eq!(call.selector, Selector(hex!("8e5080e7")));
        assert_eq!(call, Precompile::Staking.call("is_nominator", [Word::from(alith)]).unwrap());

        let calldata = call.calldata();
        assert_eq!(
            set.describe(call.target, &calldata),
            Some((Precompile::Staking, "is_nominator"))
        );

        let error = set.call(Precompile::Offences, "nominate", []).unwrap_err();
        assert!(matches!(error, Error::UnknownSelector(name) if name == "nominate"));
    }

    #[test]
    fn serde_uses_kebab_case_names() {
        let json = serde_json::to_value(Precompile::RelayManager).unwrap();
        assert_eq!(json, "relay-manager");
    }
}
