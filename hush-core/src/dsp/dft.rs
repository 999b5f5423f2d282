// Hush
// Copyright (c) 2026 The Hush Project Developers.
//
// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! The `dft` module implements the discrete Fourier transform.
//!
//! Power-of-two lengths run the iterative radix-2 Cooley-Tukey algorithm.
//! Any other length is handled by Bluestein's chirp-z transform, which
//! re-expresses the DFT as a circular convolution of power-of-two length and
//! so reuses the same radix-2 kernel. Both directions operate in place on the
//! transform's working pair; the inverse runs the forward algorithm with the
//! real and imaginary planes swapped, then scales by `1 / size`.

use std::f64;

use crate::Real;

/// An in-place DFT of a fixed size.
pub struct Dft {
    size: usize,
    /// Real plane of the working pair.
    pub real: Vec<Real>,
    /// Imaginary plane of the working pair.
    pub imag: Vec<Real>,
    ct: CooleyTukey,
    bl: Option<Bluestein>,
}

impl Dft {
    /// Create a transform of length `size`, precomputing all twiddle and
    /// chirp tables. The Bluestein working set is only allocated when `size`
    /// is not a power of two.
    pub fn new(size: usize) -> Self {
        let tab_len = if is_pow_2(size) { size / 2 } else { next_pow_2(size) / 2 };
        let ct = CooleyTukey::new(tab_len);

        let bl = if is_pow_2(size) {
            None
        }
        else {
            let mut bl = Bluestein::new(size);
            // The chirp is transformed once here and reused every run.
            cooley_tukey(&ct, &mut bl.b_re, &mut bl.b_im);
            Some(bl)
        };

        Dft { size, real: vec![0.0; size], imag: vec![0.0; size], ct, bl }
    }

    /// The transform length.
    pub fn size(&self) -> usize {
        self.size
    }

    /// Run the forward transform in place on the working pair.
    pub fn run_forward(&mut self) {
        match &mut self.bl {
            Some(bl) => bl.run(&self.ct, &mut self.real, &mut self.imag),
            None => cooley_tukey(&self.ct, &mut self.real, &mut self.imag),
        }
    }

    /// Run the inverse transform in place on the working pair.
    pub fn run_inverse(&mut self) {
        match &mut self.bl {
            Some(bl) => bl.run(&self.ct, &mut self.imag, &mut self.real),
            None => cooley_tukey(&self.ct, &mut self.imag, &mut self.real),
        }

        for re in self.real.iter_mut() {
            *re /= self.size as Real;
        }
        for im in self.imag.iter_mut() {
            *im /= self.size as Real;
        }
    }
}

/// Twiddle tables shared by every radix-2 pass of one transform.
///
/// `tab_len` entries cover half a turn: entry `i` holds the angle
/// `2 * pi * i / (2 * tab_len)`. The radix-2 kernel is only ever invoked with
/// slices of length `2 * tab_len`.
struct CooleyTukey {
    cos_tab: Vec<Real>,
    sin_tab: Vec<Real>,
}

impl CooleyTukey {
    fn new(tab_len: usize) -> Self {
        let mut cos_tab = Vec::with_capacity(tab_len);
        let mut sin_tab = Vec::with_capacity(tab_len);

        for i in 0..tab_len {
            let angle = f64::consts::PI * i as f64 / tab_len as f64;
            cos_tab.push(angle.cos() as Real);
            sin_tab.push(angle.sin() as Real);
        }

        CooleyTukey { cos_tab, sin_tab }
    }
}

/// Iterative radix-2 decimation-in-time transform over `(re, im)`.
fn cooley_tukey(ct: &CooleyTukey, re: &mut [Real], im: &mut [Real]) {
    let n = re.len();

    if n < 2 {
        return;
    }

    // Bit-reversal permutation.
    let lvls = n.trailing_zeros();

    for i in 0..n {
        let j = i.reverse_bits() >> (usize::BITS - lvls);
        if j > i {
            re.swap(i, j);
            im.swap(i, j);
        }
    }

    let mut n2 = 2;

    loop {
        let half = n2 / 2;
        let tab_step = n / n2;

        for i in (0..n).step_by(n2) {
            let mut k = 0;

            for j in i..i + half {
                let l = j + half;

                let tmp_re = re[l] * ct.cos_tab[k] + im[l] * ct.sin_tab[k];
                let tmp_im = -re[l] * ct.sin_tab[k] + im[l] * ct.cos_tab[k];

                re[l] = re[j] - tmp_re;
                im[l] = im[j] - tmp_im;

                re[j] += tmp_re;
                im[j] += tmp_im;

                k += tab_step;
            }
        }

        if n2 == n {
            break;
        }

        n2 *= 2;
    }
}

/// Bluestein working set for a transform length `n` that is not a power of
/// two. The circular convolution runs at length `nb = next_pow_2(n)`, which
/// satisfies the `>= 2n - 1` requirement of the chirp-z identity.
struct Bluestein {
    cos_tab: Vec<Real>,
    sin_tab: Vec<Real>,
    nb: usize,
    a_re: Vec<Real>,
    a_im: Vec<Real>,
    b_re: Vec<Real>,
    b_im: Vec<Real>,
    c_re: Vec<Real>,
    c_im: Vec<Real>,
}

impl Bluestein {
    fn new(n: usize) -> Self {
        let nb = next_pow_2(n);

        // Chirp angles pi * (i^2 mod 2n) / n. The modulo keeps the argument
        // small enough for full trigonometric accuracy at any index.
        let mut cos_tab = Vec::with_capacity(n);
        let mut sin_tab = Vec::with_capacity(n);

        for i in 0..n {
            let tmp = (i * i) % (2 * n);
            let angle = f64::consts::PI * tmp as f64 / n as f64;
            cos_tab.push(angle.cos() as Real);
            sin_tab.push(angle.sin() as Real);
        }

        let mut b_re = vec![0.0; nb];
        let mut b_im = vec![0.0; nb];

        b_re[0] = cos_tab[0];
        b_im[0] = sin_tab[0];
        for i in 1..n {
            b_re[i] = cos_tab[i];
            b_re[nb - i] = cos_tab[i];
            b_im[i] = sin_tab[i];
            b_im[nb - i] = sin_tab[i];
        }

        Bluestein {
            cos_tab,
            sin_tab,
            nb,
            a_re: vec![0.0; nb],
            a_im: vec![0.0; nb],
            b_re,
            b_im,
            c_re: vec![0.0; nb],
            c_im: vec![0.0; nb],
        }
    }

    fn run(&mut self, ct: &CooleyTukey, re: &mut [Real], im: &mut [Real]) {
        let n = self.cos_tab.len();

        self.a_re.fill(0.0);
        self.a_im.fill(0.0);

        for i in 0..n {
            self.a_re[i] = re[i] * self.cos_tab[i] + im[i] * self.sin_tab[i];
            self.a_im[i] = -re[i] * self.sin_tab[i] + im[i] * self.cos_tab[i];
        }

        self.convolve(ct);

        for i in 0..n {
            re[i] = self.c_re[i] * self.cos_tab[i] + self.c_im[i] * self.sin_tab[i];
            im[i] = -self.c_re[i] * self.sin_tab[i] + self.c_im[i] * self.cos_tab[i];
        }
    }

    /// Circular convolution of the prepared `a` with the pre-transformed
    /// chirp `b`, into `c`.
    fn convolve(&mut self, ct: &CooleyTukey) {
        let nb = self.nb;

        cooley_tukey(ct, &mut self.a_re, &mut self.a_im);

        for i in 0..nb {
            let tmp = self.a_re[i] * self.b_re[i] - self.a_im[i] * self.b_im[i];
            self.a_im[i] = self.a_im[i] * self.b_re[i] + self.a_re[i] * self.b_im[i];
            self.a_re[i] = tmp;
        }

        // Inverse transform, again by swapping the plane arguments.
        cooley_tukey(ct, &mut self.a_im, &mut self.a_re);

        for i in 0..nb {
            self.c_re[i] = self.a_re[i] / nb as Real;
            self.c_im[i] = self.a_im[i] / nb as Real;
        }
    }
}

fn is_pow_2(n: usize) -> bool {
    n & n.wrapping_sub(1) == 0
}

/// The convolution length used by Bluestein: the smallest power of two
/// strictly greater than `2 * n`. Intentionally generous for `n` already a
/// power of two; the chirp-z identity only needs `2 * n - 1`.
fn next_pow_2(n: usize) -> usize {
    let mut i = 1;

    while i / 2 <= n {
        i *= 2;
    }

    i
}
