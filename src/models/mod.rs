pub mod common;
pub mod course;
pub mod enrollment;
pub mod period;
pub mod student;

pub use common::{Message, NameSearchParams, Page};
pub use course::{Course, CourseQueryParams, NewCourseRequest, UpdateCourseRequest};
pub use enrollment::{Enrollment, EnrollmentQueryParams, NewEnrollmentRequest};
pub use period::{NewPeriodRequest, Period, PeriodQueryParams, UpdatePeriodRequest};
pub use student::{NewStudentRequest, Student, StudentQueryParams, UpdateStudentRequest};
