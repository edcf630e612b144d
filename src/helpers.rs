/// If the condition is not met, return the given error. Borrowed from the `anyhow` crate.
macro_rules! ensure {
    ($cond:expr, $err:expr $(,)?) => {
        if !$cond {
            return Err($err);
        }
    };
}

pub(crate) use ensure; // make available throughout crate


/// XOR `src` into `dst`; the operands must have equal length.
pub(crate) fn xor_into(dst: &mut [u8], src: &[u8]) {
    debug_assert_eq!(dst.len(), src.len(), "xor_into: length mismatch");
    for (d, s) in dst.iter_mut().zip(src.iter()) {
        *d ^= s;
    }
}


/// Distinct prime divisors of n, by trial division (n is tiny here: a degree).
pub(crate) fn prime_divisors(mut n: u64) -> Vec<u64> {
    let mut out = Vec::new();
    let mut d = 2;
    while d * d <= n {
        if n % d == 0 {
            out.push(d);
            while n % d == 0 {
                n /= d;
            }
        }
        d += 1;
    }
    if n > 1 {
        out.push(n);
    }
    out
}


/// Read a little-endian u32 at `*offset`, advancing the cursor.
pub(crate) fn read_u32_le(bytes: &[u8], offset: &mut usize) -> Result<u32, crate::Error> {
    let end = offset.checked_add(4).ok_or(crate::Error::Io("length overflow"))?;
    ensure!(end <= bytes.len(), crate::Error::Io("unexpected end of input"));
    let val = u32::from_le_bytes(bytes[*offset..end].try_into().expect("4-byte slice"));
    *offset = end;
    Ok(val)
}


/// Read `len` raw bytes at `*offset`, advancing the cursor.
pub(crate) fn read_bytes<'a>(
    bytes: &'a [u8], offset: &mut usize, len: usize,
) -> Result<&'a [u8], crate::Error> {
    let end = offset.checked_add(len).ok_or(crate::Error::Io("length overflow"))?;
    ensure!(end <= bytes.len(), crate::Error::Io("unexpected end of input"));
    let out = &bytes[*offset..end];
    *offset = end;
    Ok(out)
}


#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn cursor_reads() {
        let buf = [1u8, 0, 0, 0, 0xaa, 0xbb];
        let mut off = 0;
        assert_eq!(read_u32_le(&buf, &mut off).unwrap(), 1);
        assert_eq!(read_bytes(&buf, &mut off, 2).unwrap(), &[0xaa, 0xbb]);
        assert!(read_u32_le(&buf, &mut off).is_err());
    }
}
