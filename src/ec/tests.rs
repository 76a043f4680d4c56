use super::*;
use rand::rngs::OsRng;

fn scalar_from_u64(value: u64) -> Scalar {
    let mut bytes = [0u8; SCALAR_SIZE];
    bytes[24..].copy_from_slice(&value.to_be_bytes());
    Scalar::new(bytes).unwrap()
}

fn order_minus_one() -> Scalar {
    let mut bytes = Scalar::ORDER;
    bytes[31] -= 1;
    Scalar::from_canonical(bytes).unwrap()
}

#[test]
fn test_field_add_sub_round_trip() {
    let a = FieldElement::from_u32(0xDEAD_BEEF);
    let b = FieldElement::from_u32(0x1234_5678);
    assert_eq!(a.add(&b).sub(&b), a);
    assert_eq!(a.sub(&b).add(&b), a);
}

#[test]
fn test_field_mul_commutes_and_distributes() {
    let a = FieldElement::from_u32(7919);
    let b = FieldElement::from_u32(104_729);
    let c = FieldElement::from_u32(1_299_709);
    assert_eq!(a.mul(&b), b.mul(&a));
    assert_eq!(a.mul(&b.add(&c)), a.mul(&b).add(&a.mul(&c)));
}

#[test]
fn test_field_inversion() {
    let a = FieldElement::from_u32(0x7FFF_FFFF);
    let inv = a.invert().unwrap();
    assert_eq!(a.mul(&inv), FieldElement::one());
    assert!(FieldElement::zero().invert().is_err());
}

#[test]
fn test_field_sqrt() {
    let a = FieldElement::from_u32(1_000_003);
    let square = a.square();
    let root = square.sqrt().unwrap();
    assert!(root == a || root == a.negate());

    // 5 is a quadratic non-residue mod p
    assert!(FieldElement::from_u32(5).sqrt().is_none());
}

#[test]
fn test_field_rejects_out_of_range_bytes() {
    let all_ones = [0xFFu8; FIELD_ELEMENT_SIZE];
    assert!(FieldElement::from_bytes(&all_ones).is_err());
}

#[test]
fn test_scalar_rejects_zero_and_reduces() {
    assert!(Scalar::new([0u8; SCALAR_SIZE]).is_err());

    // n + 1 reduces to 1
    let mut bytes = Scalar::ORDER;
    bytes[31] += 1;
    let reduced = Scalar::new(bytes).unwrap();
    assert_eq!(reduced, scalar_from_u64(1));

    // from_canonical rejects the same input outright
    assert!(Scalar::from_canonical(bytes).is_err());
}

#[test]
fn test_scalar_arithmetic_identities() {
    let a = scalar_from_u64(0x0123_4567_89AB_CDEF);
    let b = scalar_from_u64(0xFEDC_BA98_7654_3210);
    assert_eq!(a.add_mod_n(&b), b.add_mod_n(&a));
    assert_eq!(a.add_mod_n(&b).sub_mod_n(&b), a);
    assert_eq!(a.mul_mod_n(&b), b.mul_mod_n(&a));
    assert_eq!(a.mul_mod_n(&a.inv_mod_n().unwrap()), scalar_from_u64(1));
    assert!(a.sub_mod_n(&a).is_zero());
    assert!(a.add_mod_n(&a.negate()).is_zero());
}

#[test]
fn test_scalar_wraps_at_order() {
    let n_minus_one = order_minus_one();
    let two = scalar_from_u64(2);
    assert_eq!(n_minus_one.add_mod_n(&two), scalar_from_u64(1));
}

#[test]
fn test_base_point_is_on_curve() {
    let g = base_point_g();
    assert!(g.is_valid());
    assert!(!g.is_identity());
}

#[test]
fn test_known_scalar_multiples_of_g() {
    let two_g = scalar_mult_base_g(&scalar_from_u64(2));
    assert_eq!(
        hex::encode(two_g.x_coordinate_bytes()),
        "c6047f9441ed7d6d3045406e95c07cd85c778e4b8cef3ca7abac09b95c709ee5"
    );
    assert_eq!(
        hex::encode(two_g.y_coordinate_bytes()),
        "1ae168fea63dc339a3c58419466ceaeef7f632653266d0e1236431a950cfe52a"
    );

    let six_g = scalar_mult_base_g(&scalar_from_u64(6));
    assert_eq!(
        hex::encode(six_g.x_coordinate_bytes()),
        "fff97bd5755eeea420453a14355235d382f6472f8568a18b2f057a1460297556"
    );
}

#[test]
fn test_group_law() {
    let g = base_point_g();
    let two_g = scalar_mult_base_g(&scalar_from_u64(2));
    let three_g = scalar_mult_base_g(&scalar_from_u64(3));

    assert_eq!(g.double(), two_g);
    assert_eq!(g.add(&two_g), three_g);
    assert_eq!(two_g.add(&g), three_g);
    assert_eq!(g.add(&Point::identity()), g);
    assert_eq!(Point::identity().add(&g), g);
    assert!(g.add(&g.negate()).is_identity());
}

#[test]
fn test_order_minus_one_times_g_is_negated_g() {
    let g = base_point_g();
    let almost = scalar_mult_base_g(&order_minus_one());
    assert_eq!(almost, g.negate());
    // adding one more step back to G wraps through the identity path
    assert!(almost.add(&g).is_identity());
}

#[test]
fn test_scalar_mult_homomorphism() {
    let a = scalar_from_u64(1_234_567);
    let b = scalar_from_u64(7_654_321);
    let sum = a.add_mod_n(&b);
    assert_eq!(
        scalar_mult_base_g(&a).add(&scalar_mult_base_g(&b)),
        scalar_mult_base_g(&sum)
    );

    let product = a.mul_mod_n(&b);
    assert_eq!(
        scalar_mult_base_g(&a).mul(&b),
        scalar_mult_base_g(&product)
    );
}

#[test]
fn test_point_serialization_round_trips() {
    let secret = random_private_key(&mut OsRng);
    let point = derive_public_key(&secret);

    let uncompressed = point.serialize_uncompressed();
    assert_eq!(uncompressed[0], 0x04);
    assert_eq!(Point::deserialize_uncompressed(&uncompressed).unwrap(), point);

    let compressed = point.serialize_compressed();
    assert!(compressed[0] == 0x02 || compressed[0] == 0x03);
    assert_eq!(Point::deserialize_compressed(&compressed).unwrap(), point);
}

#[test]
fn test_identity_serializes_to_zeros() {
    let identity = Point::identity();
    assert_eq!(identity.serialize_uncompressed(), [0u8; POINT_UNCOMPRESSED_SIZE]);
    assert_eq!(
        Point::deserialize_uncompressed(&[0u8; POINT_UNCOMPRESSED_SIZE]).unwrap(),
        identity
    );
}

#[test]
fn test_deserialize_rejects_off_curve_point() {
    let g = base_point_g();
    let mut bytes = g.serialize_uncompressed();
    bytes[64] ^= 0x01;
    assert!(Point::deserialize_uncompressed(&bytes).is_err());
}

#[test]
fn test_deserialize_rejects_bad_lengths() {
    assert!(Point::deserialize_uncompressed(&[0x04u8; 10]).is_err());
    assert!(Point::deserialize_compressed(&[0x02u8; 10]).is_err());
    assert!(Scalar::deserialize(&[0x01u8; 16]).is_err());
}

#[test]
fn test_compressed_tag_matches_parity() {
    let g = base_point_g();
    let compressed = g.serialize_compressed();
    let expected_tag = if g.y_is_odd() { 0x03 } else { 0x02 };
    assert_eq!(compressed[0], expected_tag);
}

#[test]
fn test_keypair_generation() {
    let (secret, public) = generate_keypair(&mut OsRng);
    assert!(!secret.is_zero());
    assert!(public.is_valid());
    assert_eq!(derive_public_key(&secret), public);
}
