use bitflags::bitflags;

bitflags! {
    /// Behaviour / collision flags carried by every **mobj** at runtime.
    ///
    /// Values follow `doom/info.h`; `SEETARGET` is the cached result of the
    /// per-tick sight pass.
    #[derive(Default, Clone, Copy, Debug, PartialEq, Eq)]
    pub struct MobjFlags: u32 {
        // Blocks movement.
        const SOLID          = 0x0000_0002;
        // Can be hit by projectiles and take damage.
        const SHOOTABLE      = 0x0000_0004;
        // Not linked into the thing grid; never collides with others.
        const NOBLOCKMAP     = 0x0000_0010;

        const SPAWNCEILING   = 0x0000_0100;
        const NOGRAVITY      = 0x0000_0200;

        // Movement-related
        const DROPOFF        = 0x0000_0400;
        const FLOAT          = 0x0000_4000;

        const MISSILE        = 0x0001_0000;
        const CORPSE         = 0x0010_0000;

        // Counts towards the kill total; also gates the sight pass.
        const COUNTKILL      = 0x0040_0000;

        // Charging lost soul.
        const SKULLFLY       = 0x0100_0000;

        // Target was visible at the last sight check.
        const SEETARGET      = 0x1000_0000;
    }
}
