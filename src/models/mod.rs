pub mod habit;
pub mod user;

pub use habit::{Frequency, Goal, GoalTimeframe, Habit, HabitLog};
pub use user::{EmailRef, PublicUser, User};
