//! Host event handlers and the flags that need them.

use serde::{Deserialize, Serialize};

use crate::flags::{FlagSet, ZoneFlag};

/// A host event the engine can subscribe to.
///
/// Each hook is only worth handling while some zone carries a flag that
/// reacts to it; the [`SubscriptionOptimizer`](super::SubscriptionOptimizer)
/// keeps the rest unsubscribed.
#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub enum Hook {
    OnEntityTakeDamage,
    OnPlayerChat,
    OnPlayerVoice,
    CanBuild,
    OnEntityBuilt,
    OnStructureUpgrade,
    OnStructureRepair,
    OnStructureDemolish,
    OnLootEntity,
    OnLootPlayer,
    OnItemCraft,
    OnDispenserGather,
    OnCollectiblePickup,
    OnItemPickup,
    OnEntityPickup,
    OnItemDropped,
    OnEntityDeath,
    OnPlayerWound,
    OnPlayerSuicide,
    OnRunPlayerMetabolism,
    CanTeleport,
    CanUseDoor,
    CanUseVending,
    CanRedeemKit,
    CanHideStash,
    OnCupboardAuthorize,
    OnSignUpdated,
    OnOvenToggle,
    OnShopOpen,
    OnTradeRequest,
    OnBlueprintLearn,
    OnEntityDecay,
    OnStabilityCheck,
    OnFireSpread,
    CanMountEntity,
    OnPlayerSleep,
    OnTurretTarget,
    OnHelicopterTarget,
    OnBradleyTarget,
    OnNpcTarget,
    OnEntitySpawned,
    OnNpcThink,
    OnTrapTrigger,
    OnTrapAmmoUse,
    OnLightToggle,
    OnMapMarkerAdd,
}

impl Hook {
    /// Every hook the optimizer manages.
    pub const ALL: &'static [Hook] = &[
        Hook::OnEntityTakeDamage,
        Hook::OnPlayerChat,
        Hook::OnPlayerVoice,
        Hook::CanBuild,
        Hook::OnEntityBuilt,
        Hook::OnStructureUpgrade,
        Hook::OnStructureRepair,
        Hook::OnStructureDemolish,
        Hook::OnLootEntity,
        Hook::OnLootPlayer,
        Hook::OnItemCraft,
        Hook::OnDispenserGather,
        Hook::OnCollectiblePickup,
        Hook::OnItemPickup,
        Hook::OnEntityPickup,
        Hook::OnItemDropped,
        Hook::OnEntityDeath,
        Hook::OnPlayerWound,
        Hook::OnPlayerSuicide,
        Hook::OnRunPlayerMetabolism,
        Hook::CanTeleport,
        Hook::CanUseDoor,
        Hook::CanUseVending,
        Hook::CanRedeemKit,
        Hook::CanHideStash,
        Hook::OnCupboardAuthorize,
        Hook::OnSignUpdated,
        Hook::OnOvenToggle,
        Hook::OnShopOpen,
        Hook::OnTradeRequest,
        Hook::OnBlueprintLearn,
        Hook::OnEntityDecay,
        Hook::OnStabilityCheck,
        Hook::OnFireSpread,
        Hook::CanMountEntity,
        Hook::OnPlayerSleep,
        Hook::OnTurretTarget,
        Hook::OnHelicopterTarget,
        Hook::OnBradleyTarget,
        Hook::OnNpcTarget,
        Hook::OnEntitySpawned,
        Hook::OnNpcThink,
        Hook::OnTrapTrigger,
        Hook::OnTrapAmmoUse,
        Hook::OnLightToggle,
        Hook::OnMapMarkerAdd,
    ];

    /// Hooks a single flag needs. Flags handled entirely by the
    /// membership layer (Eject, Kill, KeepPlayersIn...) need none.
    #[must_use]
    pub fn required_by(flag: ZoneFlag) -> &'static [Hook] {
        use Hook::*;
        match flag {
            ZoneFlag::PvpGod
            | ZoneFlag::PveGod
            | ZoneFlag::SleepGod
            | ZoneFlag::UnDestr
            | ZoneFlag::NoPlayerDamage
            | ZoneFlag::NoEntityDamage
            | ZoneFlag::NoExplosiveDamage
            | ZoneFlag::NoFallDamage
            | ZoneFlag::NoDrown => &[OnEntityTakeDamage],
            ZoneFlag::NoChat => &[OnPlayerChat],
            ZoneFlag::NoVoice => &[OnPlayerVoice],
            ZoneFlag::NoBuild => &[CanBuild, OnEntityBuilt],
            ZoneFlag::NoDeploy => &[OnEntityBuilt],
            ZoneFlag::NoUpgrade => &[OnStructureUpgrade],
            ZoneFlag::NoRepair => &[OnStructureRepair],
            ZoneFlag::NoRemove => &[OnStructureDemolish],
            ZoneFlag::NoLoot => &[OnLootEntity, OnLootPlayer],
            ZoneFlag::NoBoxLoot => &[OnLootEntity],
            ZoneFlag::NoPlayerLoot => &[OnLootPlayer],
            ZoneFlag::NoCraft => &[OnItemCraft],
            ZoneFlag::NoGather => &[OnDispenserGather],
            ZoneFlag::NoCollect => &[OnCollectiblePickup],
            ZoneFlag::NoPickup => &[OnItemPickup],
            ZoneFlag::NoEntityPickup => &[OnEntityPickup],
            ZoneFlag::NoDrop => &[OnItemDropped, OnEntityDeath],
            ZoneFlag::NoCorpse => &[OnEntityDeath],
            ZoneFlag::NoWounded => &[OnPlayerWound],
            ZoneFlag::NoSuicide => &[OnPlayerSuicide],
            ZoneFlag::NoBleed | ZoneFlag::NoRadiation => &[OnRunPlayerMetabolism],
            ZoneFlag::NoTp => &[CanTeleport],
            ZoneFlag::NoDoorAccess => &[CanUseDoor],
            ZoneFlag::NoVending => &[CanUseVending],
            ZoneFlag::NoKits => &[CanRedeemKit],
            ZoneFlag::NoStash => &[CanHideStash],
            ZoneFlag::NoCup => &[OnCupboardAuthorize],
            ZoneFlag::NoSignUpdates | ZoneFlag::NoSignage => &[OnSignUpdated],
            ZoneFlag::NoOvenToggle => &[OnOvenToggle],
            ZoneFlag::NoShop => &[OnShopOpen],
            ZoneFlag::NoTrade => &[OnTradeRequest],
            ZoneFlag::NoBlueprint => &[OnBlueprintLearn],
            ZoneFlag::NoDecay => &[OnEntityDecay],
            ZoneFlag::NoStability => &[OnStabilityCheck],
            ZoneFlag::NoFireSpread => &[OnFireSpread],
            ZoneFlag::NoMount => &[CanMountEntity],
            ZoneFlag::NoSleep => &[OnPlayerSleep],
            ZoneFlag::NoTurretTargeting => &[OnTurretTarget],
            ZoneFlag::NoHeliTargeting => &[OnHelicopterTarget],
            ZoneFlag::NoApcTargeting => &[OnBradleyTarget],
            ZoneFlag::NoNpcTargeting => &[OnNpcTarget],
            ZoneFlag::NoNpcSpawns => &[OnEntitySpawned],
            ZoneFlag::NpcFreeze => &[OnNpcThink],
            ZoneFlag::NoTrapTrigger => &[OnTrapTrigger],
            ZoneFlag::InfiniteTrapAmmo => &[OnTrapAmmoUse],
            ZoneFlag::AutoLights | ZoneFlag::NoLights => &[OnLightToggle],
            ZoneFlag::NoMapMarkers => &[OnMapMarkerAdd],
            ZoneFlag::Eject
            | ZoneFlag::KillSleepers
            | ZoneFlag::EjectSleepers
            | ZoneFlag::Kill
            | ZoneFlag::KeepPlayersIn
            | ZoneFlag::KeepPlayersOut => &[],
        }
    }

    /// Hooks needed by any flag in `flags`, sorted and deduplicated.
    #[must_use]
    pub fn required_by_set(flags: FlagSet) -> Vec<Hook> {
        let mut hooks: Vec<Hook> = flags.iter().flat_map(|f| Hook::required_by(f).iter().copied()).collect();
        hooks.sort_unstable();
        hooks.dedup();
        hooks
    }
}

impl std::fmt::Display for Hook {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        std::fmt::Debug::fmt(self, f)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_all_lists_every_hook_once() {
        let mut all = Hook::ALL.to_vec();
        all.sort_unstable();
        all.dedup();
        assert_eq!(all.len(), Hook::ALL.len());
    }

    #[test]
    fn test_every_required_hook_is_managed() {
        for &flag in ZoneFlag::ALL {
            for hook in Hook::required_by(flag) {
                assert!(Hook::ALL.contains(hook), "{hook} needed by {flag} is not managed");
            }
        }
    }

    #[test]
    fn test_required_by_set_dedups() {
        let flags = FlagSet::from_flags(&[ZoneFlag::PvpGod, ZoneFlag::PveGod, ZoneFlag::NoChat]);
        assert_eq!(
            Hook::required_by_set(flags),
            vec![Hook::OnEntityTakeDamage, Hook::OnPlayerChat]
        );
        assert!(Hook::required_by_set(FlagSet::from(ZoneFlag::Kill)).is_empty());
    }
}
