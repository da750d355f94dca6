use crate::spec::AuthMode;

pub const AUTH_ROUTE_PATH: &str = "src/app/api/auth/[...nextauth]/route.ts";

const GOOGLE_ROUTE: &str = r#"import NextAuth from "next-auth";
import GoogleProvider from "next-auth/providers/google";

const handler = NextAuth({
  providers: [
    GoogleProvider({
      clientId: process.env.GOOGLE_CLIENT_ID || "",
      clientSecret: process.env.GOOGLE_CLIENT_SECRET || "",
    }),
  ],
});

export { handler as GET, handler as POST };
"#;

const EMAIL_ROUTE: &str = r#"import NextAuth from "next-auth";
import EmailProvider from "next-auth/providers/email";

const handler = NextAuth({
  providers: [
    EmailProvider({
      async sendVerificationRequest({ url }) {
        console.log("Magic link:", url);
      },
    }),
  ],
});

export { handler as GET, handler as POST };
"#;

/// The auth route handler, if one applies. Static exports have no server
/// routes, so nothing is emitted in static mode.
pub fn auth_route(auth: AuthMode, is_ssr: bool) -> Option<&'static str> {
    if !is_ssr {
        return None;
    }
    match auth {
        AuthMode::None => None,
        AuthMode::GoogleOauth => Some(GOOGLE_ROUTE),
        AuthMode::EmailMagic => Some(EMAIL_ROUTE),
    }
}
