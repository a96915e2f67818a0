use uuid::Uuid;

/// Allocates an opaque, globally unique id for a new catalog entity.
/// Every entity created by the service gets its id here; seed data keeps
/// its fixed historical ids.
pub fn next_id() -> String {
    Uuid::new_v4().to_string()
}
