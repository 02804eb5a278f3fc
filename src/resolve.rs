use {
    crate::{
        query::{sized_query, QueryError},
        Backend, ClassId, Error,
    },
    log::debug,
};

/// Resolve a device class name such as `"Monitor"` to its identifiers
///
/// The identifier count is probed first, then every identifier is fetched in
/// one call. The order is whatever the backend reports.
#[doc(alias = "SetupDiClassGuidsFromNameW")]
pub fn resolve_class<B: Backend>(backend: &B, name: &str) -> Result<Vec<ClassId>, Error> {
    let ids = sized_query(0, |buf: &mut [ClassId]| backend.class_ids(name, buf)).map_err(|e| match e {
        QueryError::SizeMismatch { allocated, required } => Error::SizeProbeMismatch {
            what: "class identifiers",
            device: None,
            allocated,
            required,
        },
        QueryError::Probe(e) | QueryError::Fetch(e) => Error::ClassResolutionFailed {
            name: name.to_owned(),
            source: e.into(),
        },
    })?;

    match ids.is_empty() {
        true => Err(Error::ClassNotFound { name: name.to_owned() }),
        false => {
            debug!("device class {name:?} resolved to {ids:?}");
            Ok(ids)
        },
    }
}
