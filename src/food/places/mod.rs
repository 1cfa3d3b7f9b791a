//! 外部地点数据来源（Google Places Web Service）

pub mod api;
pub mod types;

pub use api::{PlacesApi, PlacesProvider};
pub use types::{
    NearbyPlace, NearbyQuery, NearbySearchResp, PlaceDetails, PlaceDetailsResp, PlacePhoto,
    PlacesStatus,
};
