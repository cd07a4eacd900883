pub mod network;
pub mod save;

pub use network::{
    BuildFeedback, BuildRejected, ConnectivityUpdated, NodeRegistration, RecomputeConnectivity,
    RemoveRoad, RoadRemoved, RoadToolAction,
};
pub use save::{LoadRoadsRequest, RoadPersistFailed, RoadsLoaded, RoadsSaved, SaveRoadsRequest};
