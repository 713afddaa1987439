//! The behavior flag enumeration and its name table.
//!
//! Flags are typed everywhere inside the engine. Strings only appear at
//! the API boundary, where [`ZoneFlag::from_name`] is the single lookup
//! from a caller-supplied name to a bit.

use serde::{Deserialize, Serialize};

macro_rules! zone_flags {
    ($($(#[$doc:meta])* $variant:ident = $bit:expr,)+) => {
        /// One gameplay behavior a zone grants or suppresses.
        #[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
        #[repr(u8)]
        pub enum ZoneFlag {
            $($(#[$doc])* $variant = $bit,)+
        }

        impl ZoneFlag {
            /// Every flag, in bit order.
            pub const ALL: &'static [ZoneFlag] = &[$(ZoneFlag::$variant,)+];

            /// Canonical display name.
            #[must_use]
            pub const fn name(self) -> &'static str {
                match self {
                    $(ZoneFlag::$variant => stringify!($variant),)+
                }
            }
        }
    };
}

zone_flags! {
    /// Turn on deployed lights inside the zone at night.
    AutoLights = 0,
    /// Eject anyone who is not whitelisted.
    Eject = 1,
    /// Players take no damage from other players.
    PvpGod = 2,
    /// Players take no damage from NPCs and animals.
    PveGod = 3,
    /// Sleeping players take no damage.
    SleepGod = 4,
    /// Structures take no damage.
    UnDestr = 5,
    NoBuild = 6,
    NoTp = 7,
    NoChat = 8,
    NoVoice = 9,
    NoGather = 10,
    NoLoot = 11,
    NoBoxLoot = 12,
    NoPlayerLoot = 13,
    NoBlueprint = 14,
    NoCorpse = 15,
    NoDeploy = 16,
    NoDecay = 17,
    NoDrop = 18,
    NoKits = 19,
    NoCup = 20,
    NoUpgrade = 21,
    NoRepair = 22,
    NoRemove = 23,
    NoPickup = 24,
    NoCollect = 25,
    NoEntityPickup = 26,
    NoCraft = 27,
    NoVending = 28,
    NoStash = 29,
    NoSignUpdates = 30,
    NoOvenToggle = 31,
    NoDoorAccess = 32,
    NoShop = 33,
    NoTrade = 34,
    NoBleed = 35,
    NoWounded = 36,
    NoSuicide = 37,
    NoFallDamage = 38,
    NoDrown = 39,
    NoRadiation = 40,
    NoStability = 41,
    NoFireSpread = 42,
    NoMount = 43,
    NoSleep = 44,
    NoHeliTargeting = 45,
    NoTurretTargeting = 46,
    NoApcTargeting = 47,
    NoNpcTargeting = 48,
    NoNpcSpawns = 49,
    NpcFreeze = 50,
    NoPlayerDamage = 51,
    NoEntityDamage = 52,
    NoExplosiveDamage = 53,
    InfiniteTrapAmmo = 54,
    NoTrapTrigger = 55,
    NoLights = 56,
    NoMapMarkers = 57,
    NoSignage = 58,
    /// Kill sleeping players inside the zone.
    KillSleepers = 59,
    /// Eject sleeping players from the zone.
    EjectSleepers = 60,
    /// Kill anyone who enters.
    Kill = 61,
    /// Push players back inside when they try to leave.
    KeepPlayersIn = 62,
    /// Treat the zone as closed to everyone not whitelisted.
    KeepPlayersOut = 63,
}

impl ZoneFlag {
    /// Bit position in a `FlagSet`.
    #[must_use]
    pub const fn bit(self) -> u32 {
        self as u32
    }

    /// Look up a flag by name, ignoring ASCII case.
    ///
    /// ```
    /// use zone_engine::flags::ZoneFlag;
    ///
    /// assert_eq!(ZoneFlag::from_name("nobuild"), Some(ZoneFlag::NoBuild));
    /// assert_eq!(ZoneFlag::from_name("NoFlying"), None);
    /// ```
    #[must_use]
    pub fn from_name(name: &str) -> Option<ZoneFlag> {
        ZoneFlag::ALL
            .iter()
            .copied()
            .find(|flag| flag.name().eq_ignore_ascii_case(name))
    }
}

impl std::fmt::Display for ZoneFlag {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.name())
    }
}

impl std::str::FromStr for ZoneFlag {
    type Err = crate::core::ZoneError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        ZoneFlag::from_name(s).ok_or_else(|| crate::core::ZoneError::UnknownFlag(s.to_string()))
    }
}
