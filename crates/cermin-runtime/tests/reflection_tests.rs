//! Integration tests combining type resolution with the object model
//!
//! Tests cover:
//! - Recovering an entity type from a repository hierarchy and
//!   instantiating it
//! - Copying between instances whose classes inherit fields
//! - Interface-typed fields accepting implementing classes

use cermin_runtime::{FieldCopier, ObjectRef, RuntimeError, Value};
use cermin_types::{Modifiers, TypeArg, TypeId, TypeRegistry, TypeResolver};

struct RepositoryFixture {
    registry: TypeRegistry,
    person: TypeId,
    repository: TypeId,
    person_repository: TypeId,
}

/// `PersonRepository` extends `Repository<Person>` implements
/// `IRepository<E>`; the entity parameter is recoverable from the leaf.
fn repository_fixture() -> RepositoryFixture {
    let mut registry = TypeRegistry::new();
    let string = registry.string_type();
    let person = registry
        .class("Person")
        .field("name", string, Modifiers::PUBLIC)
        .register()
        .unwrap();
    let irepository = registry
        .interface("IRepository")
        .type_params(["E"])
        .register()
        .unwrap();
    let repository = registry
        .class("Repository")
        .type_params(["E"])
        .implements_parameterized(irepository, vec![TypeArg::var("E")])
        .register()
        .unwrap();
    let person_repository = registry
        .class("PersonRepository")
        .extends_parameterized(repository, vec![TypeArg::Concrete(person)])
        .register()
        .unwrap();
    RepositoryFixture {
        registry,
        person,
        repository,
        person_repository,
    }
}

#[test]
fn test_entity_type_recovered_and_instantiated() {
    let fixture = repository_fixture();
    let registry = &fixture.registry;

    // A repository instance knows only its own class; the entity type is
    // read back from the hierarchy and allocated dynamically.
    let repo_object = ObjectRef::instantiate(registry, fixture.person_repository).unwrap();
    let resolver = TypeResolver::new(registry);
    let entity = resolver
        .supertype_argument(repo_object.class(), fixture.repository, 0)
        .unwrap()
        .expect("entity parameter must be bound");
    assert_eq!(entity, fixture.person);

    let person_object = ObjectRef::instantiate(registry, entity).unwrap();
    person_object.set(registry, "name", "Alice".into()).unwrap();
    assert_eq!(
        person_object.get(registry, "name").unwrap(),
        Value::from("Alice")
    );
}

#[test]
fn test_entity_type_recovered_through_interface() {
    let fixture = repository_fixture();
    let resolver = TypeResolver::new(&fixture.registry);
    let irepository = fixture.registry.lookup("IRepository").unwrap();

    assert_eq!(
        resolver
            .supertype_argument(fixture.person_repository, irepository, 0)
            .unwrap(),
        Some(fixture.person)
    );
    // The generic middle layer alone cannot answer.
    assert_eq!(
        resolver
            .supertype_argument(fixture.repository, irepository, 0)
            .unwrap(),
        None
    );
}

#[test]
fn test_copy_covers_declared_fields_only() {
    let mut registry = TypeRegistry::new();
    let string = registry.string_type();
    let base = registry
        .class("BasePart")
        .field("base_value", string, Modifiers::PUBLIC)
        .register()
        .unwrap();
    let leaf = registry
        .class("LeafPart")
        .extends(base)
        .field("leaf_value", string, Modifiers::PUBLIC)
        .register()
        .unwrap();

    let source = ObjectRef::instantiate(&registry, leaf).unwrap();
    source.set(&registry, "base_value", "B".into()).unwrap();
    source.set(&registry, "leaf_value", "L".into()).unwrap();
    let destination = ObjectRef::instantiate(&registry, leaf).unwrap();

    FieldCopier::new(&registry)
        .copy_fields(&source.into(), &destination.clone().into())
        .unwrap();

    // Only fields declared on the leaf class take part in the copy.
    assert_eq!(
        destination.get(&registry, "leaf_value").unwrap(),
        Value::from("L")
    );
    assert_eq!(destination.get(&registry, "base_value").unwrap(), Value::Null);
}

#[test]
fn test_interface_typed_field_accepts_implementor() {
    let mut fixture = repository_fixture();
    let irepository = fixture.registry.lookup("IRepository").unwrap();
    let service = fixture
        .registry
        .class("Service")
        .field("backend", irepository, Modifiers::PUBLIC)
        .register()
        .unwrap();

    let registry = &fixture.registry;
    let service_object = ObjectRef::instantiate(registry, service).unwrap();
    let repo_object = ObjectRef::instantiate(registry, fixture.person_repository).unwrap();
    service_object
        .set(registry, "backend", repo_object.into())
        .unwrap();

    let person_object = ObjectRef::instantiate(registry, fixture.person).unwrap();
    let err = service_object
        .set(registry, "backend", person_object.into())
        .unwrap_err();
    assert!(matches!(err, RuntimeError::TypeMismatch { .. }));
}
