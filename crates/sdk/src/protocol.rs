//! Constants of the X7 JSON-RPC search API

/// Default number of assets per page
pub const DEFAULT_ASSETS_PER_PAGE: u32 = 10;

/// Default endpoint path appended to the root URL
pub const DEFAULT_DATA_TYPE: &str = "x7/json/";

/// RPC method names used by the client
pub mod method {
    pub use netx_core::domain::envelope::{
        AUTHENTICATE_METHOD as AUTHENTICATE, GET_SELF_METHOD as GET_SELF,
    };

    pub const GET_CATEGORIES: &str = "getCategories";
    pub const GET_USER_CARTS: &str = "getUserCarts";
    pub const GET_ASSET_BEAN: &str = "getAssetBean";
    pub const SEARCH_ASSET_BEAN_OBJECTS: &str = "searchAssetBeanObjects";
}

pub mod sort_order {
    pub const ASCENDING: i32 = 0;
    pub const DESCENDING: i32 = 1;
}

pub mod search_type {
    pub const KEYWORDS: i32 = 1;
    pub const CONTENTS: i32 = 2;
    pub const METADATA: i32 = 3;
    pub const DATE: i32 = 4;
    pub const CATEGORY: i32 = 5;
    pub const FILE_FORMAT: i32 = 6;
    pub const FILE_SIZE: i32 = 7;
    pub const RAW: i32 = 8;
    pub const CUSTOM: i32 = 9;
    pub const CART: i32 = 10;
    pub const RELATED_ASSETS: i32 = 11;
    pub const LAST_SEARCH: i32 = 12;
    pub const CHECKOUT: i32 = 13;
    pub const THESAURUS: i32 = 14;
    pub const BRANCH_CHILDREN: i32 = 15;
    pub const REVIEWS: i32 = 16;
    pub const EXPIRE: i32 = 17;
    pub const METADATA_HISTORY: i32 = 18;
    pub const RATING: i32 = 19;
    pub const LOCATION: i32 = 20;
    pub const PROOF: i32 = 21;
    pub const FILE_ASPECT: i32 = 22;
}

/// Sub-types for keyword, contents and metadata searches
pub mod query_type {
    pub const AND: i32 = 0;
    pub const EXACT: i32 = 1;
    pub const OR: i32 = 2;
    pub const NOT: i32 = 3;
    pub const AND_FRAG: i32 = 4;
    pub const OR_FRAG: i32 = 5;
    pub const RANGE: i32 = 6;
    pub const PHRASE: i32 = 7;
    pub const RAW: i32 = 8;
    pub const EMPTY: i32 = 9;
}

/// Sub-types for category searches
pub mod category_type {
    pub const ONLY_RECURSIVE: i32 = 0;
    pub const EXCLUDE_RECURSIVE: i32 = 1;
    pub const ONLY: i32 = 2;
    pub const EXCLUDE: i32 = 3;
    pub const RECURSIVE: i32 = 4;
}

pub mod notify_type {
    pub const NONE: i32 = 0;
    pub const WEEKLY: i32 = 1;
    pub const DAILY: i32 = 2;
    pub const IMMEDIATELY: i32 = 3;
}
