pub mod bootstrap {

    pub const ADMIN_USERNAME: &str = "admin";

    /// Well-known first-run password; operators are expected to rotate it.
    pub const ADMIN_PASSWORD: &str = "admin123";
}

pub mod content {

    /// Sections created on first boot when absent.
    pub const DEFAULT_SECTIONS: &[&str] = &["hero", "about"];
}

pub mod patterns {

    pub const EMAIL: &str = r"^[^\s@]+@[^\s@]+\.[^\s@]+$";

    pub const MOBILE: &str = r"^1[3-9]\d{9}$";
}

pub mod uploads {

    pub const FIELD_NAME: &str = "image";

    pub const ALLOWED_EXTENSIONS: &[&str] = &["jpeg", "jpg", "png", "gif", "svg"];

    pub const URL_PREFIX: &str = "/uploads";
}

pub mod limits {

    pub const DEFAULT_PAGE: u64 = 1;

    pub const DEFAULT_PAGE_LIMIT: u64 = 10;

    pub const MAX_PAGE_LIMIT: u64 = 100;
}
