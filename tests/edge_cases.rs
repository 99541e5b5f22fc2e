use placemap::validation::bounding_box;
use placemap::{
    Backend, BoundingBox, NearestQuery, PlaceMap, PlaceMapError, Service, ServiceMask,
    ServiceMatch, decode_services, encode_services,
};

fn init_logging() {
    let _ = env_logger::builder().is_test(true).try_init();
}

fn map_with(backend: Backend, world: BoundingBox, capacity: usize) -> PlaceMap {
    PlaceMap::builder()
        .world(world)
        .leaf_capacity(capacity)
        .backend(backend)
        .build()
        .expect("Failed to create map")
}

/// Test 1: Large dataset stress test
#[test]
fn test_large_dataset_insertion() {
    init_logging();
    let mut map = PlaceMap::new().expect("Failed to create map");

    for i in 0..10_000 {
        let x = (i * 7_919) % 10_000_000;
        let y = (i * 104_729) % 10_000_000;
        map.insert(x, y, Service::ALL[(i % 10) as usize])
            .unwrap_or_else(|_| panic!("Failed to insert place {}", i));
    }

    assert_eq!(map.count_places(), 10_000);
    let nearest = map.k_nearest_by_service(5_000_000, 5_000_000, 25, Service::School);
    assert_eq!(nearest.len(), 25);
    assert!(nearest.iter().all(|p| p.services().contains(Service::School)));
}

/// Test 2: Many places on one coordinate
#[test]
fn test_duplicate_coordinates() {
    init_logging();
    for backend in [Backend::QuadTree, Backend::KdTree] {
        let mut map = map_with(backend, BoundingBox::new(0, 0, 64, 64), 2);
        for _ in 0..10 {
            map.insert(17, 42, Service::Park).unwrap();
        }
        assert_eq!(map.count_places(), 10);
        assert_eq!(map.k_nearest_by_service(0, 0, 4, Service::Park).len(), 4);

        for remaining in (0..10).rev() {
            assert!(map.delete(17, 42));
            assert_eq!(map.count_places(), remaining);
        }
        assert!(!map.delete(17, 42));
    }
}

/// Test 3: World corners and midpoint lines
#[test]
fn test_world_edges() {
    init_logging();
    let world = BoundingBox::new(-1_000, -1_000, 2_001, 2_001);
    for backend in [Backend::QuadTree, Backend::KdTree] {
        let mut map = map_with(backend, world, 1);
        let corners = [(-1_000, -1_000), (1_000, -1_000), (-1_000, 1_000), (1_000, 1_000)];
        for (x, y) in corners {
            map.insert(x, y, Service::Atm).unwrap();
        }
        let (mid_x, mid_y) = world.midpoint();
        let (mid_x, mid_y) = (mid_x as i32, mid_y as i32);
        map.insert(mid_x, mid_y, Service::Atm).unwrap();
        map.insert(mid_x - 1, mid_y - 1, Service::Atm).unwrap();

        assert_eq!(map.range_query(&world).len(), 6);
        let upper = BoundingBox::new(mid_x, mid_y, 1_001, 1_001);
        let found = map.range_query(&upper);
        assert_eq!(found.len(), 2);
        assert!(found.iter().any(|p| p.coordinates() == (mid_x, mid_y)));
        assert!(found.iter().any(|p| p.coordinates() == (1_000, 1_000)));
    }
}

/// Test 4: Extreme coordinates do not overflow distance arithmetic
#[test]
fn test_extreme_coordinates() {
    init_logging();
    let world = BoundingBox::new(i32::MIN, i32::MIN, u32::MAX, u32::MAX);
    for backend in [Backend::QuadTree, Backend::KdTree] {
        let mut map = map_with(backend, world, 1);
        map.insert(i32::MIN, i32::MIN, Service::Hospital).unwrap();
        map.insert(i32::MAX - 1, i32::MAX - 1, Service::Hospital).unwrap();
        map.insert(0, 0, Service::Hospital).unwrap();
        assert!(map.insert(i32::MAX, 0, Service::Hospital).is_err());

        let nearest = map.k_nearest_by_service(i32::MAX - 1, i32::MAX - 1, 3, Service::Hospital);
        let order: Vec<(i32, i32)> = nearest.iter().map(|p| p.coordinates()).collect();
        assert_eq!(
            order,
            vec![(i32::MAX - 1, i32::MAX - 1), (0, 0), (i32::MIN, i32::MIN)]
        );
    }
}

/// Test 5: Degenerate query inputs
#[test]
fn test_degenerate_queries() {
    init_logging();
    for backend in [Backend::QuadTree, Backend::KdTree] {
        let mut map = map_with(backend, BoundingBox::new(0, 0, 100, 100), 4);
        map.insert(10, 10, Service::Atm | Service::Park).unwrap();

        assert!(map.k_nearest_by_service(10, 10, 0, Service::Atm).is_empty());
        assert!(map.k_nearest_by_service(10, 10, 5, ServiceMask::NONE).is_empty());
        assert!(map.range_query(&BoundingBox::new(10, 10, 0, 5)).is_empty());
        assert!(map.range_query(&BoundingBox::new(500, 500, 10, 10)).is_empty());

        let all_empty = NearestQuery::new(10, 10, 5, ServiceMask::NONE).matching(ServiceMatch::All);
        assert_eq!(map.k_nearest(&all_empty).len(), 1);

        let zero_radius = NearestQuery::new(10, 10, 5, Service::Atm.mask()).within(0.0);
        assert_eq!(map.k_nearest(&zero_radius).len(), 1);
        let elsewhere = NearestQuery::new(11, 10, 5, Service::Atm.mask()).within(0.5);
        assert!(map.k_nearest(&elsewhere).is_empty());
    }
}

/// Test 6: K larger than the population
#[test]
fn test_k_exceeds_population() {
    init_logging();
    let mut map = map_with(Backend::QuadTree, BoundingBox::new(0, 0, 100, 100), 2);
    for i in 0..7 {
        map.insert(i * 10, i * 5, Service::Library).unwrap();
    }
    let found = map.k_nearest_by_service(0, 0, 1_000_000, Service::Library);
    assert_eq!(found.len(), 7);
    assert_eq!(found[0].coordinates(), (0, 0));
    assert_eq!(found[6].coordinates(), (60, 30));
}

/// Test 7: Negative rectangle extents are rejected
#[test]
fn test_negative_rectangle() {
    let err = bounding_box(0, 0, -1, 10).unwrap_err();
    assert!(matches!(err, PlaceMapError::InvalidInput(_)));
    assert!(err.to_string().contains("width"));
}

/// Test 8: Service names round trip through masks
#[test]
fn test_service_codec() {
    let names: Vec<&str> = Service::ALL.iter().map(|s| s.name()).collect();
    let mask = encode_services(&names).unwrap();
    assert_eq!(mask, ServiceMask::ALL);
    assert_eq!(decode_services(mask), names);

    assert_eq!(
        encode_services(["Park", "Spa"]),
        Err(PlaceMapError::UnknownService("Spa".to_string()))
    );
    assert_eq!(
        decode_services(ServiceMask::from_bits(1 << 12 | 1 << 3)),
        vec!["Park", "Unknown"]
    );
}

/// Test 9: Removing services can leave a place with none
#[test]
fn test_remove_all_services() {
    for backend in [Backend::QuadTree, Backend::KdTree] {
        let mut map = map_with(backend, BoundingBox::new(0, 0, 100, 100), 4);
        map.insert(1, 2, Service::Atm | Service::Pharmacy).unwrap();
        assert!(map.remove_services(1, 2, ServiceMask::ALL));

        let place = map.get(1, 2).expect("place should remain");
        assert!(place.services().is_empty());
        assert!(map.k_nearest_by_service(1, 2, 1, ServiceMask::ALL).is_empty());
        assert_eq!(map.range_query(&BoundingBox::new(0, 0, 5, 5)).len(), 1);
    }
}

/// Test 10: Invalid configuration is reported as an error
#[test]
fn test_invalid_configuration() {
    let result = PlaceMap::builder().leaf_capacity(0).build();
    assert!(matches!(result, Err(PlaceMapError::InvalidConfig(_))));

    let result = PlaceMap::builder()
        .world(BoundingBox::new(i32::MAX - 5, 0, 10, 10))
        .build();
    assert!(matches!(result, Err(PlaceMapError::InvalidConfig(_))));
}
