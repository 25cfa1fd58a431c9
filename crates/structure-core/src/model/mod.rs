pub mod movement;
pub mod movement_user_data;
pub mod routine;
pub mod skeleton;
pub mod workout;

pub use movement::Movement;
pub use movement_user_data::MovementUserData;
pub use routine::Routine;
pub use skeleton::MovementSkeleton;
pub use workout::Workout;
