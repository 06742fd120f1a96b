pub use modfetch_core::*;

#[cfg(feature = "curseforge")]
pub mod curseforge {
    pub use modfetch_curseforge::*;
}

#[cfg(feature = "modrinth")]
pub mod modrinth {
    pub use modfetch_modrinth::*;
}

#[cfg(feature = "hash")]
pub mod hash {
    pub use modfetch_hash::*;
}

#[cfg(feature = "mock")]
pub mod mock {
    pub use modfetch_mock::*;
}

pub mod prelude {
    pub use modfetch_core::prelude::*;

    #[cfg(feature = "curseforge")]
    pub use modfetch_curseforge::{CurseForgeClient, CurseForgeConfig};

    #[cfg(feature = "modrinth")]
    pub use modfetch_modrinth::{ModrinthClient, ModrinthConfig};

    #[cfg(feature = "hash")]
    pub use modfetch_hash::{PrefetchConfig, PrefetchHasher, Sha256Hasher};

    #[cfg(feature = "mock")]
    pub use modfetch_mock::{StaticCatalog, StaticHasher};
}
