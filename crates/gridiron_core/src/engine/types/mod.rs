pub mod field_point;

pub use field_point::{
    FieldPoint, CENTER_X, END_ZONE_DEPTH_YDS, FIELD_LENGTH_YDS, FIELD_WIDTH_YDS,
    MAX_BACKFIELD_DEPTH_YDS,
};
