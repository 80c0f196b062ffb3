use sha2::{Digest, Sha256};

const C32_CHARACTERS: &[u8; 32] = b"0123456789ABCDEFGHJKMNPQRSTVWXYZ";

/// Address version bytes.
pub const VERSION_MAINNET_SINGLESIG: u8 = 22;
pub const VERSION_MAINNET_MULTISIG: u8 = 20;
pub const VERSION_TESTNET_SINGLESIG: u8 = 26;
pub const VERSION_TESTNET_MULTISIG: u8 = 21;

/// Crockford-style base32 over the big-endian integer value of `input`,
/// keeping one leading `0` per leading zero byte.
pub fn c32_encode(input: &[u8]) -> String {
    let mut result: Vec<u8> = Vec::with_capacity(input.len() * 8 / 5 + 2);
    let mut carry: u8 = 0;
    let mut carry_bits: u8 = 0;

    for current in input.iter().rev() {
        let low_bits_to_take = 5 - carry_bits;
        let low_bits = current & ((1u8 << low_bits_to_take) - 1);
        let c32_value = (low_bits << carry_bits) + carry;
        result.push(C32_CHARACTERS[c32_value as usize]);

        carry_bits = (8 + carry_bits) - 5;
        carry = current >> (8 - carry_bits);

        if carry_bits >= 5 {
            let c32_value = carry & 0x1f;
            result.push(C32_CHARACTERS[c32_value as usize]);
            carry_bits -= 5;
            carry >>= 5;
        }
    }

    if carry_bits > 0 {
        result.push(C32_CHARACTERS[carry as usize]);
    }

    // drop high-order zero digits produced by the bit packing
    while result.last() == Some(&C32_CHARACTERS[0]) {
        result.pop();
    }

    for current in input {
        if *current == 0 {
            result.push(C32_CHARACTERS[0]);
        } else {
            break;
        }
    }

    result.reverse();
    result.into_iter().map(char::from).collect()
}

fn checksum(version: u8, hash160: &[u8]) -> [u8; 4] {
    let mut first = Sha256::new();
    first.update([version]);
    first.update(hash160);
    let second = Sha256::digest(first.finalize());

    let mut out = [0u8; 4];
    out.copy_from_slice(&second[..4]);
    out
}

/// c32check address: `S` + version character + c32(hash160 ‖ checksum).
pub fn c32_address(version: u8, hash160: &[u8]) -> String {
    let mut data = Vec::with_capacity(hash160.len() + 4);
    data.extend_from_slice(hash160);
    data.extend_from_slice(&checksum(version, hash160));

    let version_char = C32_CHARACTERS[(version & 0x1f) as usize] as char;
    format!("S{}{}", version_char, c32_encode(&data))
}
