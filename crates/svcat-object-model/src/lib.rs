pub mod core;
pub mod meta;
pub mod labels;
pub mod fields;
pub mod validation;

mod set;
mod error;

pub use error::ObjectError;
pub use meta::{ApiObject, ApiObjectList, ObjectMeta, TypeMeta, ListMeta};

#[cfg(any(test, feature = "fixture"))]
pub mod fixture {

    use crate::core::{Crd, CrdNames, Spec, Status};
    use crate::meta::ApiObject;

    // define test spec and status
    #[derive(Debug, Default, Clone, PartialEq, serde::Serialize, serde::Deserialize)]
    pub struct TestSpec {
        pub replica: u16,
    }

    #[derive(Debug, Default, Clone, PartialEq, serde::Serialize, serde::Deserialize)]
    pub struct TestStatus {
        pub up: bool,
    }

    impl Status for TestStatus {}

    impl Spec for TestSpec {
        type Status = TestStatus;

        fn metadata() -> &'static Crd {
            &Crd {
                group: "test.svcat",
                version: "v1",
                names: CrdNames {
                    kind: "Test",
                    plural: "tests",
                    singular: "test",
                },
            }
        }
    }

    pub type TestObject = ApiObject<TestSpec>;

    pub fn test_object(name: &str, replica: u16) -> TestObject {
        ApiObject::new(name, TestSpec { replica })
    }
}
